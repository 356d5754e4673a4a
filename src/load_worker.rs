use crate::data::{fetch_cars, fetch_questions};
use crate::logger;
use crate::models::{LoadRequest, LoadResponse};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::thread;
use std::time::Duration;

/// Runs loads off the UI thread until the request channel closes.
pub fn spawn_load_worker(
    load_tx: Sender<LoadResponse>,
    load_rx: Receiver<LoadRequest>,
    timeout: Duration,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("quiz-garage::load_worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    logger::log(&format!("Failed to start load runtime: {}", e));
                    return;
                }
            };

            while let Ok(request) = load_rx.recv() {
                let response = match request {
                    LoadRequest::Questions { path } => {
                        logger::log(&format!("Worker loading questions from {}", path.display()));
                        LoadResponse::Questions(rt.block_on(fetch_questions(&path, timeout)))
                    }
                    LoadRequest::Cars { path } => {
                        logger::log(&format!("Worker loading cars from {}", path.display()));
                        LoadResponse::Cars(rt.block_on(fetch_cars(&path, timeout)))
                    }
                };

                if load_tx.send(response).is_err() {
                    break;
                }
            }
            logger::log("Load worker channel disconnected, exiting");
        })
}
