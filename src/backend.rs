use crate::api::client::{ApiClient, ApiError};
use crate::api::types::{Draft, Message, MessageId};
use std::sync::{mpsc, Arc};
use std::thread;

/// Commands sent from the UI thread to the backend thread.
#[derive(Debug)]
pub enum BackendCommand {
    FetchMessages,
    GetMessage { id: MessageId },
    Send { draft: Draft },
    Shutdown,
}

/// Responses sent from the backend thread to the UI thread.
#[derive(Debug)]
pub enum BackendResponse {
    Messages(Result<Vec<Message>, ApiError>),
    Message {
        id: MessageId,
        result: Box<Result<Message, ApiError>>,
    },
    Sent(Result<(), ApiError>),
}

/// Spawn the backend thread. Returns the command sender and response receiver.
pub fn spawn(
    client: ApiClient,
) -> (
    mpsc::Sender<BackendCommand>,
    mpsc::Receiver<BackendResponse>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>();
    let (resp_tx, resp_rx) = mpsc::channel::<BackendResponse>();

    let client = Arc::new(client);
    thread::spawn(move || {
        backend_loop(client, cmd_rx, resp_tx);
    });

    (cmd_tx, resp_rx)
}

/// Every request runs on its own worker, so a slow list fetch never holds up
/// a detail fetch or a send. Responses arrive in completion order.
fn backend_loop(
    client: Arc<ApiClient>,
    cmd_rx: mpsc::Receiver<BackendCommand>,
    resp_tx: mpsc::Sender<BackendResponse>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::FetchMessages => {
                run_request(&client, &resp_tx, |client| {
                    BackendResponse::Messages(client.list_messages())
                });
            }
            BackendCommand::GetMessage { id } => {
                run_request(&client, &resp_tx, move |client| {
                    let result = client.get_message(&id);
                    BackendResponse::Message {
                        id,
                        result: Box::new(result),
                    }
                });
            }
            BackendCommand::Send { draft } => {
                run_request(&client, &resp_tx, move |client| {
                    BackendResponse::Sent(client.send(&draft))
                });
            }
            BackendCommand::Shutdown => {
                log::debug!("backend shutting down");
                break;
            }
        }
    }
}

fn run_request<F>(client: &Arc<ApiClient>, resp_tx: &mpsc::Sender<BackendResponse>, request: F)
where
    F: FnOnce(&ApiClient) -> BackendResponse + Send + 'static,
{
    let client = Arc::clone(client);
    let resp_tx = resp_tx.clone();
    thread::spawn(move || {
        let response = request(&client);
        // The UI may already be gone; nothing to do with the result then.
        let _ = resp_tx.send(response);
    });
}
