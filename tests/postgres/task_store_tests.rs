//! `PostgreSQL` integration tests for [`PostgresTaskStore`].

use crate::postgres::helpers::{BoardDatabase, base_time, board_task, test_runtime};
use chrono::Duration;
use mondrian::board::{
    domain::{BoardTask, ColumnId, TaskDelta, TaskId, reorder},
    ports::{TaskStore, TaskStoreError},
};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

fn placed(tasks: &[BoardTask]) -> Vec<(String, u32)> {
    tasks
        .iter()
        .map(|task| (task.title().to_owned(), task.sort_order()))
        .collect()
}

fn lane_of(entries: &[(&str, u32)]) -> Vec<(String, u32)> {
    entries
        .iter()
        .map(|(title, sort_order)| ((*title).to_owned(), *sort_order))
        .collect()
}

#[rstest]
fn same_column_reorder_commits_through_transient_duplicates(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = BoardDatabase::create(shared_test_cluster)?;
    let store = db.task_store()?;
    let rt = test_runtime()?;
    let at = base_time()?;
    let todo = ColumnId::new("todo")?;
    for (title, order) in [("t0", 0), ("t1", 1), ("t2", 2)] {
        rt.block_on(store.store(&board_task(title, "todo", order, at)?))?;
    }
    let lane = rt.block_on(store.list_by_column(&todo))?;
    let last = lane
        .last()
        .map(BoardTask::id)
        .ok_or_else(|| eyre::eyre!("lane is empty"))?;

    // t2 takes position 0 while t0 still holds it.
    let plan = reorder(&lane, last, &todo, 0)?;
    rt.block_on(store.apply_delta(plan.deltas(), at + Duration::seconds(1)))?;

    let reordered = rt.block_on(store.list_by_column(&todo))?;
    assert_eq!(placed(&reordered), lane_of(&[("t2", 0), ("t0", 1), ("t1", 2)]));
    Ok(())
}

#[rstest]
fn committed_duplicate_positions_are_rejected(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = BoardDatabase::create(shared_test_cluster)?;
    let store = db.task_store()?;
    let rt = test_runtime()?;
    let at = base_time()?;
    rt.block_on(store.store(&board_task("first", "todo", 0, at)?))?;

    let result = rt.block_on(store.store(&board_task("clash", "todo", 0, at)?));

    assert!(
        matches!(result, Err(TaskStoreError::Persistence(_))),
        "expected the position constraint to fail, got: {result:?}"
    );
    Ok(())
}

#[rstest]
fn batch_with_missing_task_rolls_back(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = BoardDatabase::create(shared_test_cluster)?;
    let store = db.task_store()?;
    let rt = test_runtime()?;
    let at = base_time()?;
    let task = board_task("stays", "todo", 0, at)?;
    rt.block_on(store.store(&task))?;
    let missing = TaskId::new();

    let result = rt.block_on(store.apply_delta(
        &[
            TaskDelta::new(task.id()).with_sort_order(5),
            TaskDelta::new(missing).with_sort_order(1),
        ],
        at + Duration::seconds(1),
    ));

    assert!(
        matches!(result, Err(TaskStoreError::NotFound(id)) if id == missing),
        "expected NotFound for the missing task, got: {result:?}"
    );
    assert_eq!(rt.block_on(store.find_by_id(task.id()))?, Some(task));
    Ok(())
}

#[rstest]
fn reapplying_a_batch_changes_nothing(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = BoardDatabase::create(shared_test_cluster)?;
    let store = db.task_store()?;
    let rt = test_runtime()?;
    let at = base_time()?;
    let moved = board_task("moved", "todo", 1, at)?;
    let untouched = board_task("untouched", "done", 0, at)?;
    rt.block_on(store.store(&moved))?;
    rt.block_on(store.store(&untouched))?;
    let deltas = [
        TaskDelta::new(moved.id())
            .with_column(ColumnId::new("done")?)
            .with_sort_order(1),
        TaskDelta::new(untouched.id()).with_sort_order(0),
    ];
    let first_at = at + Duration::seconds(1);

    rt.block_on(store.apply_delta(&deltas, first_at))?;
    let after_first = rt.block_on(store.list_by_column(&ColumnId::new("done")?))?;
    rt.block_on(store.apply_delta(&deltas, first_at + Duration::seconds(1)))?;
    let after_second = rt.block_on(store.list_by_column(&ColumnId::new("done")?))?;

    assert_eq!(after_first, after_second);
    assert_eq!(
        placed(&after_second),
        lane_of(&[("untouched", 0), ("moved", 1)])
    );
    let stamps: Vec<_> = after_second.iter().map(|task| task.updated_at()).collect();
    assert_eq!(stamps, vec![at, first_at]);
    Ok(())
}

#[rstest]
fn removal_closes_the_gap_atomically(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = BoardDatabase::create(shared_test_cluster)?;
    let store = db.task_store()?;
    let rt = test_runtime()?;
    let at = base_time()?;
    let first = board_task("first", "todo", 0, at)?;
    let second = board_task("second", "todo", 1, at)?;
    let third = board_task("third", "todo", 2, at)?;
    for task in [&first, &second, &third] {
        rt.block_on(store.store(task))?;
    }

    rt.block_on(store.remove_and_apply(
        first.id(),
        &[
            TaskDelta::new(second.id()).with_sort_order(0),
            TaskDelta::new(third.id()).with_sort_order(1),
        ],
        at + Duration::seconds(1),
    ))?;

    let lane = rt.block_on(store.list_by_column(&ColumnId::new("todo")?))?;
    assert_eq!(placed(&lane), lane_of(&[("second", 0), ("third", 1)]));
    assert_eq!(rt.block_on(store.find_by_id(first.id()))?, None);
    Ok(())
}

#[rstest]
fn failed_removal_keeps_the_task(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let db = BoardDatabase::create(shared_test_cluster)?;
    let store = db.task_store()?;
    let rt = test_runtime()?;
    let at = base_time()?;
    let first = board_task("first", "todo", 0, at)?;
    let second = board_task("second", "todo", 1, at)?;
    rt.block_on(store.store(&first))?;
    rt.block_on(store.store(&second))?;
    let missing = TaskId::new();

    let result = rt.block_on(store.remove_and_apply(
        first.id(),
        &[
            TaskDelta::new(second.id()).with_sort_order(0),
            TaskDelta::new(missing).with_sort_order(1),
        ],
        at + Duration::seconds(1),
    ));

    assert!(
        matches!(result, Err(TaskStoreError::NotFound(id)) if id == missing),
        "expected NotFound for the missing task, got: {result:?}"
    );
    let lane = rt.block_on(store.list_by_column(&ColumnId::new("todo")?))?;
    assert_eq!(placed(&lane), lane_of(&[("first", 0), ("second", 1)]));
    Ok(())
}
