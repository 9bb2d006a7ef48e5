//! Counting service client over HTTP.

use core::fmt::Write;

use defmt::{debug, warn};
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};
use heapless::String;
use reqwless::client::HttpClient;
use reqwless::request::Method;
use static_cell::StaticCell;
use teacounter::config::{HTTP_RX_BUFFER_SIZE, HTTP_TIMEOUT_MS, SERVER_HOST, SERVER_PORT};
use teacounter::service::{self, wire, CountingService, Drink, Reply, Request, Stats};
use teacounter::{Error, Result};

const TCP_BUFFER_SIZE: usize = 1024;

type Tcp = TcpClient<'static, 1, TCP_BUFFER_SIZE, TCP_BUFFER_SIZE>;

type Url = String<128>;

pub struct HttpService {
    client: HttpClient<'static, Tcp, DnsSocket<'static>>,
    user: &'static str,
    rx: [u8; HTTP_RX_BUFFER_SIZE],
}

impl HttpService {
    /// Must be called at most once.
    pub fn new(stack: Stack<'static>, user: &'static str) -> Self {
        static STATE: StaticCell<TcpClientState<1, TCP_BUFFER_SIZE, TCP_BUFFER_SIZE>> =
            StaticCell::new();
        static TCP: StaticCell<Tcp> = StaticCell::new();
        static DNS: StaticCell<DnsSocket<'static>> = StaticCell::new();

        let tcp = TCP.init(TcpClient::new(stack, STATE.init(TcpClientState::new())));
        let dns = DNS.init(DnsSocket::new(stack));
        Self {
            client: HttpClient::new(tcp, dns),
            user,
            rx: [0; HTTP_RX_BUFFER_SIZE],
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        let mut url = Url::new();
        write!(url, "http://{}:{}{}", SERVER_HOST, SERVER_PORT, path)
            .map_err(|_| Error::BufferOverflow)?;
        Ok(url)
    }

    /// One request, bounded by `HTTP_TIMEOUT_MS`, with the body decoded.
    async fn exchange<T>(
        &mut self,
        method: Method,
        path: &str,
        decode: fn(&[u8]) -> Result<T>,
    ) -> Result<T> {
        let url = self.url(path)?;
        debug!("HTTP: {}", url.as_str());

        let client = &mut self.client;
        let rx = &mut self.rx;
        let round_trip = async {
            let mut request = client
                .request(method, url.as_str())
                .await
                .map_err(|_| Error::Network)?;
            let response = request.send(rx).await.map_err(|_| Error::Network)?;
            if !response.status.is_successful() {
                return Err(Error::Status(response.status.0));
            }
            let body = response.body().read_to_end().await.map_err(|e| match e {
                reqwless::Error::BufferTooSmall => Error::BufferOverflow,
                _ => Error::Network,
            })?;
            decode(body)
        };

        match with_timeout(Duration::from_millis(HTTP_TIMEOUT_MS), round_trip).await {
            Ok(result) => result,
            Err(_) => {
                warn!("HTTP: {} timed out", url.as_str());
                Err(Error::Timeout)
            }
        }
    }
}

impl CountingService for HttpService {
    async fn register(&mut self, drink: Drink) -> Result<Reply> {
        let path = service::request_path(self.user, Request::Register(drink))?;
        self.exchange(Method::POST, &path, wire::decode_reply).await
    }

    async fn undo(&mut self) -> Result<Reply> {
        let path = service::request_path(self.user, Request::Undo)?;
        self.exchange(Method::POST, &path, wire::decode_reply).await
    }

    async fn stats(&mut self) -> Result<Stats> {
        let path = service::stats_path(self.user)?;
        self.exchange(Method::GET, &path, wire::decode_stats).await
    }
}
