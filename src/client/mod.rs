//! Connection/session state machine and the concurrent send/receive
//! engine.

mod error;
mod opts;
mod session;
mod stream;

pub use error::*;
pub use opts::{ClientOpts, ClientOptsBuilder, ConnectOpts, ConnectOptsBuilder, PublishOpts};
pub use session::Session;

use crate::{
    codec::{Connack, Disconnect, Pingreq, RxPacket, TxPacket},
    io::{Connection, Dialer, TcpDialer},
};
use std::{sync::Arc, time::Duration};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::{mpsc, mpsc::error::TrySendError, Mutex, RwLock},
    time::{self, Instant},
};
use tracing::{debug, error, info, warn};

const SEND_QUEUE_CAPACITY: usize = 1024;
const ERROR_CHANNEL_CAPACITY: usize = 1024;
const INBOUND_CHANNEL_CAPACITY: usize = 1024;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Phase {
    Disconnected,
    Connecting,
    AwaitingAck,
    Connected,
    Disconnecting,
}

/// Connection-scoped mutable state. Guarded by the client's single
/// reader/writer lock; all mutation and all existence checks of the
/// connection and session go through it.
struct State<StreamT> {
    phase: Phase,
    connection: Option<Arc<Connection<StreamT>>>,
    session: Option<Session>,
    outbound: Option<mpsc::Sender<TxPacket>>,
}

struct Shared<StreamT> {
    state: RwLock<State<StreamT>>,
    inbound_tx: mpsc::Sender<RxPacket>,
    error_tx: mpsc::Sender<ClientError>,
}

impl<StreamT> Shared<StreamT>
where
    StreamT: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    /// Tears the live connection down under the state lock: best-effort
    /// DISCONNECT, close, clear the connection reference, discard a clean
    /// session. A failure of an earlier step never stops a later one.
    async fn teardown_locked(state: &mut State<StreamT>) -> Result<(), ClientError> {
        let connection = match state.connection.take() {
            Some(connection) => connection,
            None => return Err(NotYetConnected.into()),
        };

        state.outbound = None;
        state.phase = Phase::Disconnecting;

        let result = teardown_connection(&connection).await;

        if state.session.as_ref().map_or(false, Session::clean_session) {
            state.session = None;
        }

        state.phase = Phase::Disconnected;
        result
    }

    /// Teardown path of the background loops. Quietly exits when another
    /// path already tore the connection down, so only the loop that
    /// observed the failure first publishes it.
    async fn teardown_after(&self, snapshot: &Arc<Connection<StreamT>>, error: ClientError) {
        let mut state = self.state.write().await;

        let live = state
            .connection
            .as_ref()
            .map_or(false, |connection| Arc::ptr_eq(connection, snapshot));
        if !live {
            return;
        }

        let report = match Self::teardown_locked(&mut state).await {
            Ok(()) => error,
            Err(second) => TeardownError::new(second, error).into(),
        };
        drop(state);

        self.notify_error(report);
    }

    fn notify_error(&self, error: ClientError) {
        match self.error_tx.try_send(error) {
            Ok(()) => {}
            Err(TrySendError::Full(error)) => {
                warn!(%error, "error notification dropped, sink is full");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

/// Sends a best-effort DISCONNECT and closes the connection, composing a
/// second failure with the first instead of masking it.
///
/// The DISCONNECT write uses the non-blocking writer acquire: if a
/// concurrent write still holds the writer, the packet is skipped so
/// teardown never waits on peer I/O.
async fn teardown_connection<StreamT>(
    connection: &Connection<StreamT>,
) -> Result<(), ClientError>
where
    StreamT: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let mut first: Option<ClientError> = None;

    if let Some(Err(err)) = connection
        .try_write_packet(&TxPacket::Disconnect(Disconnect))
        .await
    {
        first = Some(err.into());
    }

    if let Err(err) = connection.close().await {
        let err = ClientError::Transport(err);
        first = Some(match first.take() {
            Some(original) => TeardownError::new(err, original).into(),
            None => err,
        });
    }

    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn send_loop<StreamT>(
    shared: Arc<Shared<StreamT>>,
    mut outbound: mpsc::Receiver<TxPacket>,
    keep_alive: Duration,
) where
    StreamT: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let mut deadline = Instant::now() + keep_alive;

    loop {
        let packet = if keep_alive.is_zero() {
            match outbound.recv().await {
                Some(packet) => packet,
                None => break,
            }
        } else {
            tokio::select! {
                maybe_packet = outbound.recv() => match maybe_packet {
                    Some(packet) => packet,
                    None => break,
                },
                _ = time::sleep_until(deadline) => TxPacket::Pingreq(Pingreq),
            }
        };

        // Snapshot the connection under a short read lock; the blocking
        // write happens with no lock held.
        let connection = shared.state.read().await.connection.clone();
        let connection = match connection {
            Some(connection) => connection,
            None => break,
        };

        match connection.write_packet(&packet).await {
            Ok(()) => {
                debug!(packet_type = ?packet.packet_type(), "packet sent");
                deadline = Instant::now() + keep_alive;
            }
            Err(err) => {
                error!(error = ?err, "failed to send packet");
                shared.teardown_after(&connection, err.into()).await;
                break;
            }
        }
    }
}

async fn recv_loop<StreamT>(shared: Arc<Shared<StreamT>>)
where
    StreamT: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    loop {
        let connection = shared.state.read().await.connection.clone();
        let connection = match connection {
            Some(connection) => connection,
            None => break,
        };

        match connection.read_packet().await {
            Ok(packet) => {
                debug!(packet_type = ?packet.packet_type(), "packet received");

                if shared.inbound_tx.send(packet).await.is_err() {
                    break;
                }
            }
            Err(err) => {
                error!(error = ?err, "failed to receive packet");
                shared.teardown_after(&connection, err.into()).await;
                break;
            }
        }
    }
}

/// MQTT client: owns the connection and the session, runs the connect
/// handshake and supervises the background send and receive loops.
///
/// All operations take `&self`; the client is shared across tasks as-is.
/// Asynchronous failures of the background loops are delivered through
/// [next_error](Client::next_error), never silently dropped while the
/// error sink has capacity.
pub struct Client<DialerT: Dialer = TcpDialer> {
    dialer: DialerT,
    opts: ClientOpts,
    shared: Arc<Shared<DialerT::Stream>>,
    inbound_rx: Mutex<mpsc::Receiver<RxPacket>>,
    error_rx: Mutex<mpsc::Receiver<ClientError>>,
}

impl Client<TcpDialer> {
    /// Creates a client that dials plain TCP.
    pub fn new(opts: ClientOpts) -> Self {
        Self::with_dialer(TcpDialer, opts)
    }
}

impl<DialerT: Dialer> Client<DialerT> {
    /// Creates a client on a custom transport.
    pub fn with_dialer(dialer: DialerT, opts: ClientOpts) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CHANNEL_CAPACITY);
        let (error_tx, error_rx) = mpsc::channel(ERROR_CHANNEL_CAPACITY);

        Self {
            dialer,
            opts,
            shared: Arc::new(Shared {
                state: RwLock::new(State {
                    phase: Phase::Disconnected,
                    connection: None,
                    session: None,
                    outbound: None,
                }),
                inbound_tx,
                error_tx,
            }),
            inbound_rx: Mutex::new(inbound_rx),
            error_rx: Mutex::new(error_rx),
        }
    }

    /// Dials the broker, performs the CONNECT/CONNACK handshake and starts
    /// the background send and receive loops.
    ///
    /// Fails with [AlreadyConnected] while a connection is held. On any
    /// handshake failure the connection is torn down before the error is
    /// returned and the client is left disconnected, with no residual
    /// state.
    pub async fn connect(
        &self,
        network: &str,
        address: &str,
        opts: ConnectOpts,
    ) -> Result<(), ClientError> {
        {
            let mut state = self.shared.state.write().await;

            if state.connection.is_some() || state.phase != Phase::Disconnected {
                return Err(AlreadyConnected.into());
            }

            state.phase = Phase::Connecting;
        }

        match self.handshake(network, address, opts).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.shared.state.write().await.phase = Phase::Disconnected;
                Err(err)
            }
        }
    }

    async fn handshake(
        &self,
        network: &str,
        address: &str,
        opts: ConnectOpts,
    ) -> Result<(), ClientError> {
        let stream = self
            .dialer
            .dial(network, address)
            .await
            .map_err(ClientError::Transport)?;
        let connection = Connection::new(stream);

        // Resolve the session before CONNECT is built: a reused persistent
        // session overrides the requested client identifier.
        let existing = self.shared.state.read().await.session.clone();
        let session = Session::resolve(existing, opts.clean_session(), opts.client_identifier());

        let connect = match opts.to_packet(session.client_identifier()) {
            Ok(packet) => packet,
            Err(err) => return Err(abort_handshake(&connection, err.into()).await),
        };

        if let Err(err) = connection.write_packet(&TxPacket::Connect(connect)).await {
            return Err(abort_handshake(&connection, err.into()).await);
        }

        self.shared.state.write().await.phase = Phase::AwaitingAck;

        let connack = match self.await_connack(&connection).await {
            Ok(connack) => connack,
            Err(err) => return Err(abort_handshake(&connection, err).await),
        };

        info!(
            client_identifier = session.client_identifier(),
            session_present = connack.session_present(),
            return_code = ?connack.return_code(),
            "connected"
        );

        let (outbound_tx, outbound_rx) = mpsc::channel(SEND_QUEUE_CAPACITY);
        let connection = Arc::new(connection);
        let keep_alive = Duration::from_secs(opts.keep_alive() as u64);

        {
            let mut state = self.shared.state.write().await;
            state.connection = Some(connection.clone());
            state.session = Some(session);
            state.outbound = Some(outbound_tx);
            state.phase = Phase::Connected;
        }

        tokio::spawn(send_loop(self.shared.clone(), outbound_rx, keep_alive));
        tokio::spawn(recv_loop(self.shared.clone()));

        Ok(())
    }

    /// Waits for the first inbound packet, bounded by the configured
    /// acknowledgement timeout (zero disables the deadline).
    async fn await_connack(
        &self,
        connection: &Connection<DialerT::Stream>,
    ) -> Result<Connack, ClientError> {
        let read = connection.read_packet();

        let packet = if self.opts.connack_timeout().is_zero() {
            read.await?
        } else {
            match time::timeout(self.opts.connack_timeout(), read).await {
                Ok(result) => result?,
                Err(_) => return Err(ConnackTimeout.into()),
            }
        };

        match packet {
            RxPacket::Connack(connack) => Ok(connack),
            _ => Err(NotConnack.into()),
        }
    }

    /// Sends a DISCONNECT, closes the connection, clears the connection
    /// reference and discards the session if it is clean.
    ///
    /// Fails with [NotYetConnected], performing no action, when no
    /// connection is held.
    pub async fn disconnect(&self) -> Result<(), ClientError> {
        let mut state = self.shared.state.write().await;
        let result = Shared::teardown_locked(&mut state).await;
        drop(state);

        if result.is_ok() {
            info!("disconnected");
        }

        result
    }

    /// Enqueues a packet for the send loop. Packets are written to the
    /// wire in submission order; the call blocks while the outbound queue
    /// (capacity 1024) is full.
    ///
    /// Fails with [NotYetConnected] when no connection is held.
    pub async fn send(&self, packet: TxPacket) -> Result<(), ClientError> {
        let outbound = self.shared.state.read().await.outbound.clone();
        let outbound = match outbound {
            Some(outbound) => outbound,
            None => return Err(NotYetConnected.into()),
        };

        outbound
            .send(packet)
            .await
            .map_err(|_| NotYetConnected.into())
    }

    /// Builds a PUBLISH packet from the options and enqueues it.
    pub async fn publish(&self, opts: PublishOpts) -> Result<(), ClientError> {
        let packet = opts.build()?;
        self.send(TxPacket::Publish(packet)).await
    }

    /// Blocking pull of the next decoded inbound packet, in wire arrival
    /// order.
    pub async fn recv(&self) -> Option<RxPacket> {
        self.inbound_rx.lock().await.recv().await
    }

    /// Blocking pull of the next asynchronous failure reported by the
    /// background loops.
    pub async fn next_error(&self) -> Option<ClientError> {
        self.error_rx.lock().await.recv().await
    }

    /// Snapshot of the live session, if any.
    pub async fn session(&self) -> Option<Session> {
        self.shared.state.read().await.session.clone()
    }

    /// Whether a connection is currently held.
    pub async fn is_connected(&self) -> bool {
        self.shared.state.read().await.connection.is_some()
    }
}

impl<DialerT: Dialer> Drop for Client<DialerT> {
    fn drop(&mut self) {
        // Dropping the outbound sender and the connection reference lets
        // the background loops run down; the stream itself closes when the
        // last loop drops its snapshot.
        if let Ok(mut state) = self.shared.state.try_write() {
            state.outbound = None;
            state.connection = None;
            state.phase = Phase::Disconnected;
        }
    }
}

/// Tears a half-open handshake connection down, composing a teardown
/// failure with the error that aborted the handshake.
async fn abort_handshake<StreamT>(
    connection: &Connection<StreamT>,
    error: ClientError,
) -> ClientError
where
    StreamT: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    match teardown_connection(connection).await {
        Ok(()) => error,
        Err(second) => TeardownError::new(second, error).into(),
    }
}
