use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;

use tui_pathtree::{
    DisplayOrder, DisplayTree, PathEntries, PathTreeConfig, PathTreeProps, PathTreeView,
    SelectionSet, build_path_tree,
};

// 10 * 20 * 50 leaves under three levels of branches.
fn entries() -> PathEntries {
    let mut paths = PathEntries::new();
    for a in 0..10 {
        for b in 0..20 {
            for c in 0..50 {
                paths.insert(format!("dataset_{a}/era_{b}/sample_{c}"), "hist".to_string());
            }
        }
    }
    paths
}

fn bench_build(c: &mut Criterion) {
    let paths = entries();
    let config = PathTreeConfig::default();

    c.bench_function("build_path_tree/10k", |b| {
        b.iter(|| build_path_tree(black_box(&config), black_box(&paths)));
    });

    c.bench_function("display_tree/branches_first/10k", |b| {
        b.iter_batched(
            || build_path_tree(&config, &paths).ok(),
            |tree| tree.map(|tree| DisplayTree::new(tree, DisplayOrder::BranchesFirst)),
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_view(c: &mut Criterion) {
    let props = PathTreeProps {
        paths: entries(),
        expand: true,
        ..PathTreeProps::default()
    };
    let Ok(mut view) = PathTreeView::new(&props) else {
        return;
    };
    let area = Rect::new(0, 0, 80, 40);
    let mut buffer = Buffer::empty(area);

    c.bench_function("render/expanded/10k", |b| {
        b.iter(|| {
            view.state_mut().invalidate();
            view.render(area, &mut buffer);
        });
    });

    let selection: SelectionSet = props.paths.keys().step_by(3).cloned().collect();
    c.bench_function("host_selection_changed/3k", |b| {
        b.iter(|| view.host_selection_changed(black_box(&selection)));
    });

    c.bench_function("search/show_matches/10k", |b| {
        b.iter(|| {
            view.set_search("sample_4");
            view.render(area, &mut buffer);
        });
    });
}

criterion_group!(benches, bench_build, bench_view);
criterion_main!(benches);
