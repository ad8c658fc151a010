//! Integration tests for [`InMemoryTaskStore`].

use crate::in_memory::helpers::{board_task, clock, runtime, store};
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use mondrian::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{
        BoardTask, ColumnId, PersistedBoardTaskData, TaskDelta, TaskDetails, TaskId,
        TaskPlacement, TaskStatus, UserId,
    },
    ports::{TaskStore, TaskStoreError},
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

#[rstest]
fn columns_list_in_sort_order(
    runtime: io::Result<Runtime>,
    store: InMemoryTaskStore,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    for (title, order) in [("third", 2), ("first", 0), ("second", 1)] {
        rt.block_on(store.store(&board_task(title, "todo", order, &clock)?))?;
    }
    rt.block_on(store.store(&board_task("elsewhere", "done", 0, &clock)?))?;

    let lane = rt.block_on(store.list_by_column(&ColumnId::new("todo")?))?;
    let titles: Vec<&str> = lane.iter().map(|task| task.title()).collect();

    assert_eq!(titles, vec!["first", "second", "third"]);
    Ok(())
}

#[rstest]
fn storing_twice_is_rejected(
    runtime: io::Result<Runtime>,
    store: InMemoryTaskStore,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let task = board_task("once", "todo", 0, &clock)?;
    rt.block_on(store.store(&task))?;

    let result = rt.block_on(store.store(&task));

    assert!(matches!(result, Err(TaskStoreError::DuplicateTask(id)) if id == task.id()));
    Ok(())
}

#[rstest]
fn delta_batches_apply_every_change(
    runtime: io::Result<Runtime>,
    store: InMemoryTaskStore,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let first = board_task("first", "todo", 0, &clock)?;
    let second = board_task("second", "todo", 1, &clock)?;
    rt.block_on(store.store(&first))?;
    rt.block_on(store.store(&second))?;

    let deltas = [
        TaskDelta::new(second.id()).with_sort_order(0),
        TaskDelta::new(first.id())
            .with_column(ColumnId::new("done")?)
            .with_status(TaskStatus::Done)
            .with_sort_order(0),
    ];
    rt.block_on(store.apply_delta(&deltas, clock.utc()))?;

    let moved = rt
        .block_on(store.find_by_id(first.id()))?
        .ok_or_else(|| eyre::eyre!("moved task missing"))?;
    assert_eq!(moved.column_id().as_str(), "done");
    assert_eq!(moved.status(), TaskStatus::Done);
    let todo = rt.block_on(store.list_by_column(&ColumnId::new("todo")?))?;
    assert_eq!(todo.len(), 1);
    assert_eq!(todo.first().map(|task| task.sort_order()), Some(0));
    Ok(())
}

#[rstest]
fn delta_batch_with_unknown_task_writes_nothing(
    runtime: io::Result<Runtime>,
    store: InMemoryTaskStore,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let task = board_task("stays", "todo", 3, &clock)?;
    rt.block_on(store.store(&task))?;
    let missing = TaskId::new();

    let result = rt.block_on(store.apply_delta(
        &[
            TaskDelta::new(task.id()).with_sort_order(0),
            TaskDelta::new(missing).with_sort_order(1),
        ],
        clock.utc(),
    ));

    assert!(matches!(result, Err(TaskStoreError::NotFound(id)) if id == missing));
    assert_eq!(rt.block_on(store.find_by_id(task.id()))?, Some(task));
    Ok(())
}

#[rstest]
fn removing_a_missing_task_fails(
    runtime: io::Result<Runtime>,
    store: InMemoryTaskStore,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let missing = TaskId::new();

    let result = rt.block_on(store.remove(missing));

    assert!(matches!(result, Err(TaskStoreError::NotFound(id)) if id == missing));
    Ok(())
}

#[rstest]
fn tied_positions_list_newest_first(
    runtime: io::Result<Runtime>,
    store: InMemoryTaskStore,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let earlier = clock.utc() - Duration::minutes(5);
    for (title, created_at) in [("older", earlier), ("newer", clock.utc())] {
        let task = BoardTask::from_persisted(PersistedBoardTaskData {
            id: TaskId::new(),
            placement: TaskPlacement {
                column_id: ColumnId::new("todo")?,
                status: TaskStatus::Todo,
                sort_order: 0,
            },
            assignee_id: None,
            created_by: UserId::new("u1")?,
            details: TaskDetails::new(title)?,
            created_at,
            updated_at: created_at,
        });
        rt.block_on(store.store(&task))?;
    }

    let lane = rt.block_on(store.list_by_column(&ColumnId::new("todo")?))?;
    let titles: Vec<&str> = lane.iter().map(|task| task.title()).collect();

    assert_eq!(titles, vec!["newer", "older"]);
    Ok(())
}

#[rstest]
fn removal_closes_the_gap_in_one_step(
    runtime: io::Result<Runtime>,
    store: InMemoryTaskStore,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let first = board_task("first", "todo", 0, &clock)?;
    let second = board_task("second", "todo", 1, &clock)?;
    rt.block_on(store.store(&first))?;
    rt.block_on(store.store(&second))?;

    rt.block_on(store.remove_and_apply(
        first.id(),
        &[TaskDelta::new(second.id()).with_sort_order(0)],
        clock.utc(),
    ))?;

    assert_eq!(rt.block_on(store.find_by_id(first.id()))?, None);
    let lane = rt.block_on(store.list_by_column(&ColumnId::new("todo")?))?;
    let placed: Vec<(&str, u32)> = lane
        .iter()
        .map(|task| (task.title(), task.sort_order()))
        .collect();
    assert_eq!(placed, vec![("second", 0)]);
    Ok(())
}

#[rstest]
fn failed_removal_keeps_the_task_and_its_column(
    runtime: io::Result<Runtime>,
    store: InMemoryTaskStore,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let first = board_task("first", "todo", 0, &clock)?;
    let second = board_task("second", "todo", 1, &clock)?;
    rt.block_on(store.store(&first))?;
    rt.block_on(store.store(&second))?;
    let missing = TaskId::new();

    let result = rt.block_on(store.remove_and_apply(
        first.id(),
        &[
            TaskDelta::new(second.id()).with_sort_order(0),
            TaskDelta::new(missing).with_sort_order(1),
        ],
        clock.utc(),
    ));

    assert!(matches!(result, Err(TaskStoreError::NotFound(id)) if id == missing));
    assert_eq!(rt.block_on(store.find_by_id(first.id()))?, Some(first));
    assert_eq!(rt.block_on(store.find_by_id(second.id()))?, Some(second));
    Ok(())
}

#[rstest]
fn reapplying_a_batch_keeps_the_first_timestamps(
    runtime: io::Result<Runtime>,
    store: InMemoryTaskStore,
    clock: DefaultClock,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let task = board_task("moved", "todo", 2, &clock)?;
    rt.block_on(store.store(&task))?;
    let deltas = [TaskDelta::new(task.id()).with_sort_order(0)];
    let first_at = clock.utc() + Duration::seconds(1);

    rt.block_on(store.apply_delta(&deltas, first_at))?;
    rt.block_on(store.apply_delta(&deltas, first_at + Duration::seconds(1)))?;

    let stored = rt
        .block_on(store.find_by_id(task.id()))?
        .ok_or_else(|| eyre::eyre!("task missing"))?;
    assert_eq!(stored.sort_order(), 0);
    assert_eq!(stored.updated_at(), first_at);
    Ok(())
}
