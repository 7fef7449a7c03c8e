//! End-to-end scenarios driven entirely through the public `Message` /
//! `Command` protocol against an in-memory `VecDataSource`, the way a real
//! host's event loop would.

use vtable_core::{
    Command, DataRequest, ListController, Message, TableColumn, TableController, TreeController,
    TreeNode, VecDataSource, ViewportConfig,
};

fn drive_list(controller: &mut ListController<String>, source: &VecDataSource<String>, command: Command) {
    match command {
        Command::GetTotal => {
            if let Some(next) = controller.update(Message::DataTotal { total: source.total() }) {
                drive_list(controller, source, next);
            }
        }
        Command::LoadChunk(request) => {
            let start = request.start;
            let items = source.fetch(&request);
            if let Some(next) = controller.update(Message::DataChunkLoaded { start, items, request }) {
                drive_list(controller, source, next);
            }
        }
        Command::Batch(commands) => {
            for c in commands {
                drive_list(controller, source, c);
            }
        }
        _ => {}
    }
}

/// S3 — chunk load gate: jumping far ahead of the loaded region shows
/// placeholders and gates navigation until the covering chunk resolves.
#[test]
fn chunk_load_gate_blocks_navigation_until_covering_chunk_resolves() {
    let source = VecDataSource::new((0..100).map(|i| format!("row-{i}")).collect());
    let mut controller = ListController::new(
        ViewportConfig { height: 5, chunk_size: 10, ..ViewportConfig::default() },
        |s: &String| s.clone(),
        |i| format!("loading-{i}"),
    );

    if let Some(command) = controller.update(Message::Init) {
        drive_list(&mut controller, &source, command);
    }
    assert!(controller.can_scroll());

    let command = controller.update(Message::JumpTo { index: 55 }).unwrap();
    assert!(!controller.can_scroll());
    assert!(controller.visible_items()[0].loading);

    drive_list(&mut controller, &source, command);
    assert!(controller.can_scroll());
    assert!(!controller.visible_items()[0].loading);
    assert_eq!(controller.visible_items()[0].data, "row-53");
}

/// S4 — cascading tree selection survives an expand/collapse round trip.
#[test]
fn tree_selection_cascades_and_survives_collapse() {
    let forest = vec![TreeNode::new("root", "Root").with_children(vec![
        TreeNode::new("child-a", "Child A"),
        TreeNode::new("child-b", "Child B"),
    ])];
    let mut tree = TreeController::new(
        ViewportConfig { height: 5, chunk_size: 10, ..ViewportConfig::default() },
        forest,
        |s: &&str| s.to_string(),
    );

    tree.update(Message::Expand { id: "root".to_string() });
    tree.update(Message::SelectCurrent);
    tree.update(Message::SelectionResponse { success: true, error: None });
    assert_eq!(tree.total_items(), 3);

    tree.update(Message::Collapse { id: "root".to_string() });
    assert_eq!(tree.total_items(), 1);

    tree.update(Message::Expand { id: "root".to_string() });
    let visible = tree.visible_items();
    assert!(visible.iter().any(|item| item.id == "child-a" && item.selected));
    assert!(visible.iter().any(|item| item.id == "child-b" && item.selected));
}

/// S5 — table cell truncation keeps every row at exactly the column width.
#[test]
fn table_cells_truncate_to_exact_column_width() {
    #[derive(Clone)]
    struct Row {
        name: String,
    }
    let source = VecDataSource::new(vec![
        Row { name: "a-very-long-identifier".to_string() },
        Row { name: "short".to_string() },
    ]);

    let columns = vec![TableColumn::new("name", "Name", 10, |r: &Row| r.name.clone())];
    let mut table = TableController::new(
        ViewportConfig { height: 5, chunk_size: 10, ..ViewportConfig::default() },
        columns,
        |_| Row { name: String::new() },
    );

    table.update(Message::DataTotal { total: source.total() });
    let request = DataRequest::new(0, 10);
    let items = source.fetch(&request);
    table.update(Message::DataChunkLoaded { start: 0, items, request });

    let lines = table.view_lines(&vtable_core::Theme::default());
    for line in &lines {
        let width: usize = line.spans.iter().map(|s| s.content.chars().count()).sum();
        assert_eq!(width, 10);
    }
}

/// S6 — full-row highlight overrides whatever color a column formatter
/// would otherwise apply to the cursor row.
#[test]
fn full_row_highlight_wins_over_column_styling() {
    use ratatui::style::{Color, Style};

    #[derive(Clone)]
    struct Row {
        status: String,
    }
    let columns = vec![TableColumn::new("status", "Status", 8, |r: &Row| r.status.clone())
        .with_style(|r: &Row| if r.status == "error" { Style::default().fg(Color::Red) } else { Style::default() })];

    let source = VecDataSource::new(vec![Row { status: "error".to_string() }]);
    let mut table = TableController::new(
        ViewportConfig { height: 3, chunk_size: 10, ..ViewportConfig::default() },
        columns,
        |_| Row { status: String::new() },
    )
    .with_full_row_highlight(true);

    table.update(Message::DataTotal { total: source.total() });
    let request = DataRequest::new(0, 10);
    let items = source.fetch(&request);
    table.update(Message::DataChunkLoaded { start: 0, items, request });

    let theme = vtable_core::Theme::default();
    let lines = table.view_lines(&theme);
    assert_eq!(lines[0].spans[0].style, theme.full_row_cursor_style);
}

/// Full filter round trip: applying a filter discards resident chunks and
/// re-requests from scratch, and the host's filtered dataset flows back
/// through the same `DataTotal`/`LoadChunk` pair as a first load.
#[test]
fn filter_round_trip_reloads_from_an_empty_cache() {
    let source = VecDataSource::new((0..20).map(|i| format!("item-{i}")).collect());
    let mut controller = ListController::new(
        ViewportConfig { height: 5, chunk_size: 5, ..ViewportConfig::default() },
        |s: &String| s.clone(),
        |i| format!("loading-{i}"),
    );
    if let Some(command) = controller.update(Message::Init) {
        drive_list(&mut controller, &source, command);
    }
    assert!(!controller.visible_items()[0].loading);

    let command = controller
        .update(Message::FilterSet { field: "status".to_string(), value: "open".to_string() })
        .unwrap();
    assert_eq!(command, Command::GetTotal);
    assert!(controller.visible_items()[0].loading);
}
