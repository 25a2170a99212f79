//! Conexão WebSocket com o Stream de Trades

use async_trait::async_trait;
use futures_util::stream::SplitStream;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::{DecodeError, FeedError};
use crate::extract::decode_trade;
use crate::types::TradeEvent;

/// Fonte de trades decodificados.
///
/// `None` encerra a fonte. Um `Some(Err(_))` descarta só aquela mensagem.
#[async_trait]
pub trait TradeSource: Send {
    async fn next_trade(&mut self) -> Option<Result<TradeEvent, DecodeError>>;
}

type WsRead = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Uma conexão com o stream `<symbol>@trade` da Binance.
///
/// Sem reconexão: se a conexão cair, a fonte termina e as atualizações param.
pub struct BinanceFeed {
    url: String,
    read: WsRead,
    frames: u64,
}

impl BinanceFeed {
    pub async fn connect(url: &str) -> Result<Self, FeedError> {
        info!(url, "conectando");
        let (ws_stream, response) = connect_async(url).await.map_err(|source| FeedError::Connect {
            url: url.to_string(),
            source,
        })?;
        info!(status = %response.status(), "conectado");

        // A escrita não é usada: o stream de trades não recebe comandos.
        let (_write, read) = ws_stream.split();
        Ok(Self {
            url: url.to_string(),
            read,
            frames: 0,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TradeSource for BinanceFeed {
    async fn next_trade(&mut self) -> Option<Result<TradeEvent, DecodeError>> {
        loop {
            match self.read.next().await? {
                Ok(Message::Text(text)) => {
                    self.frames += 1;
                    return Some(decode_trade(&text));
                }
                Ok(Message::Close(frame)) => {
                    info!(url = %self.url, ?frame, frames = self.frames, "conexão fechada pelo servidor");
                    return None;
                }
                Ok(other) => {
                    debug!(kind = ?message_kind(&other), "mensagem ignorada");
                }
                Err(e) => {
                    warn!(url = %self.url, error = %e, "erro lendo do WebSocket");
                    return None;
                }
            }
        }
    }
}

fn message_kind(msg: &Message) -> &'static str {
    match msg {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "frame",
    }
}

/// Repassa os trades da fonte para o consumidor único.
///
/// Mensagens que não decodificam são descartadas e a leitura continua.
/// Termina quando a fonte acaba ou quando o receptor é fechado.
///
/// # Retorno
/// Quantidade de trades repassados.
pub async fn forward_trades<S: TradeSource>(mut source: S, tx: mpsc::Sender<TradeEvent>) -> u64 {
    let mut forwarded = 0u64;
    let mut skipped = 0u64;

    while let Some(next) = source.next_trade().await {
        match next {
            Ok(trade) => {
                if tx.send(trade).await.is_err() {
                    debug!("receptor fechado, encerrando feed");
                    break;
                }
                forwarded += 1;
            }
            Err(e) => {
                skipped += 1;
                warn!(error = %e, skipped, "mensagem descartada");
            }
        }
    }

    info!(forwarded, skipped, "feed encerrado");
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::SinkExt;
    use std::collections::VecDeque;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    const TRADE: &str = r#"{"e":"trade","p":"101.50","q":"0.002000","T":1700000000000,"m":false}"#;

    /// Servidor local que envia `frames` para o primeiro cliente e, se
    /// `close` for falso, derruba o socket sem handshake de fechamento.
    async fn serve_once(frames: Vec<Message>, close: bool) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            for frame in frames {
                ws.send(frame).await.unwrap();
            }
            if close {
                ws.send(Message::Close(None)).await.unwrap();
                // Espera o cliente responder o Close
                while let Some(Ok(_)) = ws.next().await {}
            }
        });

        format!("ws://{}", addr)
    }

    #[tokio::test]
    async fn websocket_skips_control_frames_and_ends_on_close() {
        let url = serve_once(
            vec![
                Message::Ping(vec![1, 2, 3]),
                Message::Binary(vec![0xde, 0xad]),
                Message::Text(TRADE.to_string()),
                Message::Pong(vec![]),
                Message::Text("{quebrado".to_string()),
            ],
            true,
        )
        .await;

        let mut feed = BinanceFeed::connect(&url).await.unwrap();
        assert_eq!(feed.url(), url);

        let trade = feed.next_trade().await.unwrap().unwrap();
        assert_eq!(trade.price, 101.5);
        assert_eq!(trade.timestamp_ms(), 1_700_000_000_000);

        assert!(matches!(feed.next_trade().await, Some(Err(DecodeError::Json(_)))));
        assert!(feed.next_trade().await.is_none());
    }

    #[tokio::test]
    async fn websocket_ends_when_socket_drops() {
        let url = serve_once(vec![Message::Text(TRADE.to_string())], false).await;

        let mut feed = BinanceFeed::connect(&url).await.unwrap();
        assert!(matches!(feed.next_trade().await, Some(Ok(_))));
        assert!(feed.next_trade().await.is_none());
    }

    #[tokio::test]
    async fn connect_error_names_the_url() {
        // Porta liberada logo após o bind: ninguém escutando
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let url = format!("ws://{}", addr);

        match BinanceFeed::connect(&url).await {
            Err(FeedError::Connect { url: failed, .. }) => assert_eq!(failed, url),
            Ok(_) => panic!("conexão inesperada em {}", url),
        }
    }

    struct Scripted(VecDeque<&'static str>);

    #[async_trait]
    impl TradeSource for Scripted {
        async fn next_trade(&mut self) -> Option<Result<TradeEvent, DecodeError>> {
            self.0.pop_front().map(decode_trade)
        }
    }

    #[tokio::test]
    async fn stops_when_receiver_dropped() {
        let source = Scripted(VecDeque::from(vec![
            r#"{"p":"1.00","q":"1","T":1700000000000,"m":false}"#,
            r#"{"p":"2.00","q":"1","T":1700000000001,"m":false}"#,
        ]));
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        assert_eq!(forward_trades(source, tx).await, 0);
    }

    #[test]
    fn names_control_frames() {
        assert_eq!(message_kind(&Message::Ping(vec![])), "ping");
        assert_eq!(message_kind(&Message::Binary(vec![1])), "binary");
    }
}
