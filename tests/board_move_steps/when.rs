//! When steps for board move BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use mondrian::board::{
    domain::{ColumnId, UserId},
    services::{MoveTaskRequest, UpdateBoardTaskRequest},
};
use rstest_bdd_macros::when;

#[when(r#""{actor}" moves "{title}" to column "{column}" at index {index:usize}"#)]
fn move_task(
    world: &mut BoardWorld,
    actor: String,
    title: String,
    column: String,
    index: usize,
) -> Result<(), eyre::Report> {
    let request = MoveTaskRequest::new(
        world.task_id(&title)?,
        ColumnId::new(column)?,
        index,
        UserId::new(actor)?,
    );
    world.last_move_result = Some(run_async(world.service.move_task(request)));
    Ok(())
}

#[when(r#""{actor}" assigns "{title}" to "{assignee}""#)]
fn assign_task(
    world: &mut BoardWorld,
    actor: String,
    title: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let request = UpdateBoardTaskRequest::new(world.task_id(&title)?, UserId::new(actor)?)
        .with_assignee(Some(UserId::new(assignee)?));
    run_async(world.service.update_task(request)).wrap_err("assign task in scenario")?;
    Ok(())
}

#[when(r#""{actor}" deletes "{title}""#)]
fn delete_task(world: &mut BoardWorld, actor: String, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    run_async(world.service.delete_task(task_id, &UserId::new(actor)?))
        .wrap_err("delete task in scenario")?;
    Ok(())
}
