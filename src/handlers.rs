use crate::errors::AppError;
use crate::form::FormField;
use crate::models::{
    BoardQuery, BoardResponse, CreateTaskRequest, FieldUpdate, FilterForm, FilterSelection,
    TaskCard, TaskForm, TaskId, TaskStats,
};
use crate::state::{AppState, Board};
use crate::stats::build_stats;
use crate::ui::render_index;
use crate::views::{filter_tasks, timeline};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let board = state.board.lock().await;
    Html(render_index(&board))
}

pub async fn set_field(
    State(state): State<AppState>,
    Json(payload): Json<FieldUpdate>,
) -> Result<StatusCode, AppError> {
    let field: FormField = payload.name.parse()?;
    let mut board = state.board.lock().await;
    board.draft.set_field(field, &payload.value)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_task(
    State(state): State<AppState>,
    Form(payload): Form<TaskForm>,
) -> Result<Redirect, AppError> {
    let mut guard = state.board.lock().await;
    let Board { store, draft, .. } = &mut *guard;

    draft.fill(&payload.title, &payload.note, payload.priority.as_deref())?;
    draft.submit(store);

    Ok(Redirect::to("/"))
}

pub async fn task_action(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let mut board = state.board.lock().await;
    board.store.apply_next_action(&TaskId::from(id));
    Redirect::to("/")
}

pub async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let mut board = state.board.lock().await;
    board.store.remove(&TaskId::from(id));
    Redirect::to("/")
}

pub async fn set_filter(
    State(state): State<AppState>,
    Form(payload): Form<FilterForm>,
) -> Result<Redirect, AppError> {
    let filter: FilterSelection = payload.filter.parse()?;
    state.board.lock().await.filter = filter;
    Ok(Redirect::to("/"))
}

pub async fn get_board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let board = state.board.lock().await;
    let filter = match query.filter.as_deref() {
        Some(raw) => raw.parse()?,
        None => board.filter,
    };
    Ok(Json(board_response(&board, filter)))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<TaskStats> {
    let board = state.board.lock().await;
    Json(build_stats(board.store.tasks()))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<BoardResponse>), AppError> {
    let mut board = state.board.lock().await;
    board
        .store
        .create(&payload.title, &payload.note, payload.priority)?;
    let filter = board.filter;
    Ok((StatusCode::CREATED, Json(board_response(&board, filter))))
}

pub async fn advance_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<BoardResponse> {
    let mut board = state.board.lock().await;
    board.store.advance(&TaskId::from(id));
    let filter = board.filter;
    Json(board_response(&board, filter))
}

pub async fn reset_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<BoardResponse> {
    let mut board = state.board.lock().await;
    board.store.reset_to_queued(&TaskId::from(id));
    let filter = board.filter;
    Json(board_response(&board, filter))
}

pub async fn remove_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<BoardResponse> {
    let mut board = state.board.lock().await;
    board.store.remove(&TaskId::from(id));
    let filter = board.filter;
    Json(board_response(&board, filter))
}

fn board_response(board: &Board, filter: FilterSelection) -> BoardResponse {
    let tasks = board.store.tasks();
    BoardResponse {
        revision: board.store.revision(),
        filter,
        stats: build_stats(tasks),
        tasks: filter_tasks(tasks, filter).into_iter().map(TaskCard::from).collect(),
        timeline: timeline(tasks).into_iter().cloned().collect(),
    }
}
