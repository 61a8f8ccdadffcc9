/// Actions that a user or application can initiate on the tree view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeAction<Custom = ()> {
    /// Move the cursor to the previous visible row.
    CursorPrev,
    /// Move the cursor to the next visible row.
    CursorNext,
    /// Move the cursor to the parent node.
    CursorParent,
    /// Expand the cursor node; if possible, move to an expandable descendant.
    CursorChild,
    /// Move the cursor to the first visible row.
    CursorFirst,
    /// Move the cursor to the last visible row.
    CursorLast,
    /// Toggle expansion recursively for the cursor subtree.
    ToggleRecursive,
    /// Toggle expansion for the cursor node only.
    ToggleNode,
    /// Expand all nodes in the tree.
    ExpandAll,
    /// Collapse everything below the root.
    CollapseAll,
    /// Add or remove the cursor node from the selection (leaves only).
    ToggleSelect,
    /// Select every selectable node.
    SelectAll,
    /// Clear the selection.
    DeselectAll,
    /// Toggle drawing of guide lines.
    ToggleGuides,
    /// Ask the application to focus its search input.
    FocusSearch,
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeEvent<Custom = ()> {
    /// The action was handled internally and view state was updated.
    Handled,
    /// The action was ignored (e.g., no cursor / nothing to do).
    Unhandled,
    /// The selection changed; it should be pushed to the host.
    SelectionChanged,
    /// The action is forwarded to the caller for handling.
    Action(TreeAction<Custom>),
}
