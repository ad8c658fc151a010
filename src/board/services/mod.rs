//! Application services for board orchestration.

mod board;

pub use board::{
    BoardService, BoardServiceError, BoardServiceResult, BoardView, ColumnView,
    CreateBoardTaskRequest, MoveOutcome, MoveTaskRequest, TaskOutcome, UpdateBoardTaskRequest,
};
