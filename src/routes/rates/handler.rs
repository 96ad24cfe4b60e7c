use axum::{
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::{
    AppState,
    common::{error_codes, error_to_api_response, success_to_api_response},
    rates::service,
};

use super::model::RatesResponse;

/// 拉取当前汇率，供不等待推送的调用方使用
/// 回退链保证总能返回数据，不会失败
#[axum::debug_handler]
pub async fn get_current_rates(State(state): State<AppState>) -> impl IntoResponse {
    let rates = service::get_current_rates(&state).await;
    (StatusCode::OK, success_to_api_response(RatesResponse { rates }))
}

/// 按货币代码读取单个汇率，大小写不敏感
#[axum::debug_handler]
pub async fn get_rate(
    State(state): State<AppState>,
    Path(currency_code): Path<String>,
) -> impl IntoResponse {
    match service::get_rate(&state, &currency_code).await {
        Some(rate) => (StatusCode::OK, success_to_api_response(rate)),
        None => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "未知的货币代码".to_string()),
        ),
    }
}

/// 汇率推送的WebSocket端点
/// 每个连接订阅一个广播接收端，事件以JSON文本帧转发
#[axum::debug_handler]
pub async fn rates_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let mut rx = state.rates_tx.subscribe();
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize rate event: {}", e);
                            continue;
                        }
                    };
                    // 单个订阅者发送失败只断开它自己
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                // 落后的订阅者跳过积压的事件继续接收
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Rate subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            msg = receiver.next() => match msg {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(_)) => break,
                _ => {}
            },
        }
    }
}
