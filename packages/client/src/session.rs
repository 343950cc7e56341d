//! WebSocket client session management.
//!
//! One session is one stay in one room. Socket reads, typed commands and the
//! countdown ticker are multiplexed in a single loop that owns the view.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use handraise_shared::{
    protocol::COUNTDOWN_POLL_INTERVAL_MILLIS,
    time::{Clock, SystemClock},
};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{net::TcpStream, sync::mpsc, time::MissedTickBehavior};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use url::Url;

use crate::{
    command::Command,
    countdown::CountdownTracker,
    error::ClientError,
    formatter::MessageFormatter,
    router::{ClientMessageRouter, ViewUpdate},
    ui::{prompt, redisplay_prompt},
    view::ClientView,
};

type SocketWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Run the WebSocket client session
///
/// Returns `Ok(())` when the user leaves, `ClientError::Disconnected` when the
/// server side goes away.
pub async fn run_client_session(
    join_url: &Url,
    room_id: &str,
    username: &str,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(join_url.as_str())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to {}", join_url);
    let mut view = ClientView::new(room_id.to_string(), username.to_string());
    view.in_room = true;
    print!("{}", MessageFormatter::format_welcome(&view, join_url.as_str()));

    let (mut write, mut read) = ws_stream.split();
    let mut input_rx = spawn_readline(prompt(username));

    let clock = SystemClock;
    let mut tracker = CountdownTracker::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(COUNTDOWN_POLL_INTERVAL_MILLIS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            message = read.next() => {
                let reason = match message {
                    Some(Ok(Message::Text(text))) => {
                        match ClientMessageRouter::route(&mut view, text.as_str(), clock.now_millis()) {
                            Some(ViewUpdate::Members) => {
                                print!("{}", MessageFormatter::format_members(&view));
                            }
                            Some(ViewUpdate::HandState(change)) => {
                                if let Some(line) = MessageFormatter::format_hand_change(&view, change) {
                                    tracker.reset();
                                    print!("{}", line);
                                }
                            }
                            None => {}
                        }
                        redisplay_prompt(username);
                        continue;
                    }
                    Some(Ok(Message::Close(_))) | None => "connection closed".to_string(),
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        format!("connection error ({})", e)
                    }
                    Some(Ok(_)) => continue,
                };
                return Err(disconnect(&mut view, reason));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // Ctrl+C or Ctrl+D at the prompt
                    leave(&mut write).await;
                    return Ok(());
                };
                match Command::parse(&line) {
                    Some(Command::Raise) => {
                        if view.is_current_user_holding() {
                            print!("{}", MessageFormatter::format_already_raising());
                        } else if let Some(holder) = view.holder() {
                            print!("{}", MessageFormatter::format_raise_unavailable(holder));
                        } else {
                            send(&mut write, &mut view, ClientMessageRouter::raise_hand()?).await?;
                        }
                    }
                    Some(Command::Lower) => {
                        if view.is_current_user_holding() {
                            send(&mut write, &mut view, ClientMessageRouter::lower_hand()?).await?;
                        } else {
                            print!("{}", MessageFormatter::format_not_holding());
                        }
                    }
                    Some(Command::Who) => {
                        print!("{}", MessageFormatter::format_members(&view));
                        print!("{}", MessageFormatter::format_hand_state(&view));
                    }
                    Some(Command::Help) => print!("{}", MessageFormatter::format_help()),
                    Some(Command::Quit) => {
                        leave(&mut write).await;
                        return Ok(());
                    }
                    None => print!("{}", MessageFormatter::format_unknown_command(&line)),
                }
                redisplay_prompt(username);
            }
            _ = ticker.tick() => {
                let remaining = view.remaining_millis(clock.now_millis());
                if let (Some(ms), Some(holder)) = (tracker.update(remaining), view.holder()) {
                    print!("{}", MessageFormatter::format_countdown(holder, ms));
                    redisplay_prompt(username);
                }
            }
        }
    }
}

/// Read lines on a dedicated thread; the channel closes on Ctrl+C or Ctrl+D.
fn spawn_readline(prompt: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

async fn send(
    write: &mut SocketWriter,
    view: &mut ClientView,
    json: String,
) -> Result<(), ClientError> {
    if let Err(e) = write.send(Message::text(json)).await {
        tracing::warn!("Failed to send message: {}", e);
        return Err(disconnect(view, format!("connection error ({})", e)));
    }
    Ok(())
}

async fn leave(write: &mut SocketWriter) {
    if let Err(e) = write.close().await {
        tracing::debug!("Close handshake failed: {}", e);
    }
    tracing::info!("Left the room");
}

fn disconnect(view: &mut ClientView, reason: String) -> ClientError {
    view.in_room = false;
    print!("{}", MessageFormatter::format_disconnected(&reason));
    ClientError::Disconnected(reason)
}
