//! Given steps for board move BDD scenarios.

use super::world::{BoardWorld, run_async, titles};
use eyre::WrapErr;
use mondrian::board::{
    domain::{BoardConfiguration, ColumnId, UserId, WipEnforcement},
    services::CreateBoardTaskRequest,
};
use rstest_bdd_macros::given;

#[given("a four-lane board")]
fn four_lane_board(world: &mut BoardWorld) {
    *world = BoardWorld::with_board(BoardConfiguration::four_lane());
}

#[given("a strict four-lane board")]
fn strict_four_lane_board(world: &mut BoardWorld) {
    *world = BoardWorld::with_board(
        BoardConfiguration::four_lane().with_wip_enforcement(WipEnforcement::Strict),
    );
}

#[given(r#"the column "{column}" holds tasks "{list}""#)]
fn column_holds_tasks(
    world: &mut BoardWorld,
    column: String,
    list: String,
) -> Result<(), eyre::Report> {
    let column_id = ColumnId::new(column)?;
    let creator = UserId::new("u1")?;
    for title in titles(&list) {
        let outcome = run_async(world.service.create_task(CreateBoardTaskRequest::new(
            column_id.clone(),
            title.clone(),
            creator.clone(),
        )))
        .wrap_err_with(|| format!("create task {title} for scenario setup"))?;
        world.tasks.insert(title, outcome.task().id());
    }
    Ok(())
}
