//! Interactive client loop.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use idobata_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use super::error::ClientError;

/// Connection settings for the CLI client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub contact: String,
}

/// Run the interactive client until EOF or the connection closes.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let url = format!("ws://{}:{}/ws", config.host, config.port);
    let (ws, _) = connect_async(&url).await?;
    tracing::info!("connected to {}", url);

    let (mut write, mut read) = ws.split();

    // Join the shared room first; everything after that is plain messaging
    let join = ClientEvent::Join {
        name: config.name.clone(),
        contact: config.contact.clone(),
    };
    write
        .send(Message::Text(serde_json::to_string(&join)?.into()))
        .await?;

    // Print inbound events as they arrive
    let mut print_task = tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(ServerEvent::RoomMessage { text, sender }) => {
                        println!("[{sender}] {text}");
                    }
                    Ok(ServerEvent::DirectMessage { text, sender }) => {
                        println!("[{sender} (direct)] {text}");
                    }
                    Err(e) => {
                        tracing::warn!("ignoring malformed server event: {}", e);
                    }
                },
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    // Feed prompt lines from a blocking thread into the async writer
    let mut editor = DefaultEditor::new()?;
    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                // Ctrl-C / Ctrl-D ends the session
                Err(_) => break,
            }
        }
    });

    let name = config.name;
    loop {
        tokio::select! {
            _ = &mut print_task => break,
            maybe_line = line_rx.recv() => {
                let Some(line) = maybe_line else { break };
                let Some(event) = parse_line(&line, &name) else { continue };
                write
                    .send(Message::Text(serde_json::to_string(&event)?.into()))
                    .await?;
            }
        }
    }

    print_task.abort();
    Ok(())
}

/// Turn one prompt line into an outbound event.
///
/// `/dm <name> <text>` sends a direct message; anything else is a room
/// message. Blank lines and `/dm` lines without a message body are skipped.
fn parse_line(line: &str, sender: &str) -> Option<ClientEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = line.strip_prefix("/dm ") {
        let (to, text) = rest.trim().split_once(' ')?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        return Some(ClientEvent::DirectMessage {
            to: to.to_string(),
            text: text.to_string(),
            sender: sender.to_string(),
        });
    }

    Some(ClientEvent::RoomMessage {
        text: line.to_string(),
        sender: sender.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_room_message() {
        // テスト項目: 通常の行はルームメッセージになる
        // when (操作):
        let event = parse_line("hello everyone", "Alice");

        // then (期待する結果):
        match event {
            Some(ClientEvent::RoomMessage { text, sender }) => {
                assert_eq!(text, "hello everyone");
                assert_eq!(sender, "Alice");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_line_direct_message() {
        // テスト項目: /dm 行はダイレクトメッセージになる
        // when (操作):
        let event = parse_line("/dm Bob see you at noon", "Alice");

        // then (期待する結果):
        match event {
            Some(ClientEvent::DirectMessage { to, text, sender }) => {
                assert_eq!(to, "Bob");
                assert_eq!(text, "see you at noon");
                assert_eq!(sender, "Alice");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_line_blank_is_skipped() {
        // テスト項目: 空行・空白のみの行は送信されない
        // then (期待する結果):
        assert!(parse_line("", "Alice").is_none());
        assert!(parse_line("   ", "Alice").is_none());
    }

    #[test]
    fn test_parse_line_dm_without_body_is_skipped() {
        // テスト項目: 本文のない /dm 行は送信されない
        // then (期待する結果):
        assert!(parse_line("/dm Bob", "Alice").is_none());
        assert!(parse_line("/dm Bob   ", "Alice").is_none());
    }
}
