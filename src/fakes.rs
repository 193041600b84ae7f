//! Scripted collaborators for the monitor stages
//!
//! Every fake writes to a shared [EventLog] so tests can check the order of calls across stages.

use std::{
    cell::RefCell,
    collections::VecDeque,
    io,
    rc::Rc,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    display::{DisplayError, DisplaySurface, PixelLayout, pack_rows},
    four_cc::FourCCVideo,
    frame::{Frame, FrameKind, VideoBuffer, VideoView},
    monitor::{Connector, FrameReceiver, SourceDiscovery},
    receiver::ReceiverError,
    resolution::{Resolution, ResolutionError},
    source::NDISource,
    tally::Tally,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Poll,
    Wait,
    DiscoveryDropped,
    Connect { name: String, address: Option<String> },
    Tally(Tally),
    ConnectionQuery,
    Capture,
    Decode { width: usize, height: usize },
    Show,
    PumpEvents,
    Release(FrameKind),
}

#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn polls(&self) -> usize {
        self.0.borrow().iter().filter(|e| **e == Event::Poll).count()
    }

    pub fn connect_attempts(&self) -> Vec<(String, Option<String>)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Connect { name, address } => Some((name.clone(), address.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn releases(&self) -> Vec<FrameKind> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Release(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }
}

/// Returns one scripted snapshot per poll, the last one repeats
pub struct FakeDiscovery {
    log: EventLog,
    snapshots: VecDeque<Vec<NDISource>>,
    last: Vec<NDISource>,
}

impl FakeDiscovery {
    pub fn new(log: &EventLog, snapshots: Vec<Vec<(&str, &str)>>) -> Self {
        let snapshots = snapshots
            .into_iter()
            .map(|snapshot| {
                snapshot
                    .into_iter()
                    .map(|(name, address)| NDISource::with_address(name, address).unwrap())
                    .collect()
            })
            .collect();
        FakeDiscovery {
            log: log.clone(),
            snapshots,
            last: Vec::new(),
        }
    }
}

impl SourceDiscovery for FakeDiscovery {
    fn current_sources(&mut self) -> Vec<NDISource> {
        self.log.push(Event::Poll);
        if let Some(snapshot) = self.snapshots.pop_front() {
            self.last = snapshot;
        }
        self.last.clone()
    }

    fn wait_for_change(&mut self, _timeout: Duration) {
        self.log.push(Event::Wait);
    }
}

impl Drop for FakeDiscovery {
    fn drop(&mut self) {
        self.log.push(Event::DiscoveryDropped);
    }
}

/// Succeeds or fails connection attempts in script order, the receiver of the first success gets
/// the scripted connection counts and frames
pub struct FakeConnector {
    log: EventLog,
    results: VecDeque<bool>,
    receiver: Option<FakeReceiver>,
}

impl FakeConnector {
    pub fn new(
        log: &EventLog,
        results: Vec<bool>,
        counts: Vec<Result<usize, ReceiverError>>,
        frames: Vec<FakeFrame>,
    ) -> Self {
        FakeConnector {
            log: log.clone(),
            results: results.into(),
            receiver: Some(FakeReceiver::new(log, counts, frames)),
        }
    }

    /// The connected receiver refuses tally updates
    pub fn reject_tally(mut self) -> Self {
        if let Some(receiver) = &mut self.receiver {
            receiver.tally_accepted = false;
        }
        self
    }
}

impl Connector for FakeConnector {
    type Receiver = FakeReceiver;

    fn connect(&mut self, source: &NDISource) -> Result<FakeReceiver, ReceiverError> {
        self.log.push(Event::Connect {
            name: source.name().to_owned(),
            address: source.address().map(str::to_owned),
        });

        let failed = || ReceiverError::CreateFailed {
            source_name: source.name().to_owned(),
        };
        if self.results.pop_front().unwrap_or(false) {
            self.receiver.take().ok_or_else(failed)
        } else {
            Err(failed())
        }
    }
}

pub struct FakeReceiver {
    log: EventLog,
    counts: VecDeque<Result<usize, ReceiverError>>,
    frames: VecDeque<FakeFrame>,
    tally_accepted: bool,
}

impl FakeReceiver {
    pub fn new(
        log: &EventLog,
        counts: Vec<Result<usize, ReceiverError>>,
        frames: Vec<FakeFrame>,
    ) -> Self {
        FakeReceiver {
            log: log.clone(),
            counts: counts.into(),
            frames: frames.into(),
            tally_accepted: true,
        }
    }
}

impl FrameReceiver for FakeReceiver {
    type Video = FakeVideo;
    type Audio = FakeBuffer;
    type Metadata = FakeBuffer;

    fn set_tally(&mut self, tally: Tally) -> bool {
        self.log.push(Event::Tally(tally));
        self.tally_accepted
    }

    fn connection_count(&mut self, _timeout: Duration) -> Result<usize, ReceiverError> {
        self.log.push(Event::ConnectionQuery);
        self.counts
            .pop_front()
            .expect("connection queried more often than scripted")
    }

    /// Returns [Frame::None] once the script ran out
    fn capture(&mut self, _timeout: Duration) -> Frame<FakeVideo, FakeBuffer, FakeBuffer> {
        self.log.push(Event::Capture);
        let Some(frame) = self.frames.pop_front() else {
            return Frame::None;
        };

        let buffer = |kind| FakeBuffer {
            log: self.log.clone(),
            kind,
        };
        match frame {
            FakeFrame::Video {
                width,
                height,
                stride,
                len,
            } => Frame::Video(FakeVideo {
                width,
                height,
                stride,
                data: vec![0; len],
                _buffer: buffer(FrameKind::Video),
            }),
            FakeFrame::Audio => Frame::Audio(buffer(FrameKind::Audio)),
            FakeFrame::Metadata => Frame::Metadata(buffer(FrameKind::Metadata)),
            FakeFrame::StatusChange => Frame::StatusChange,
            FakeFrame::None => Frame::None,
            FakeFrame::Unknown(frame_type) => Frame::Unknown(frame_type),
        }
    }
}

/// Script entry of a [FakeReceiver]
#[derive(Debug, Clone)]
pub enum FakeFrame {
    /// BGRA video
    Video {
        width: usize,
        height: usize,
        stride: usize,
        len: usize,
    },
    Audio,
    Metadata,
    StatusChange,
    None,
    Unknown(i64),
}

impl FakeFrame {
    /// Tightly packed BGRA frame
    pub fn video(width: usize, height: usize) -> Self {
        FakeFrame::Video {
            width,
            height,
            stride: width * 4,
            len: width * height * 4,
        }
    }

    pub fn kind(&self) -> FrameKind {
        match self {
            FakeFrame::Video { .. } => FrameKind::Video,
            FakeFrame::Audio => FrameKind::Audio,
            FakeFrame::Metadata => FrameKind::Metadata,
            FakeFrame::StatusChange => FrameKind::StatusChange,
            FakeFrame::None => FrameKind::None,
            FakeFrame::Unknown(_) => FrameKind::Unknown,
        }
    }
}

/// Logs its release when dropped
#[derive(Debug)]
pub struct FakeBuffer {
    log: EventLog,
    kind: FrameKind,
}

impl Drop for FakeBuffer {
    fn drop(&mut self) {
        self.log.push(Event::Release(self.kind));
    }
}

#[derive(Debug)]
pub struct FakeVideo {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
    _buffer: FakeBuffer,
}

impl VideoBuffer for FakeVideo {
    fn view(&self) -> Result<VideoView<'_>, ResolutionError> {
        Ok(VideoView {
            resolution: Resolution::new(self.width, self.height),
            four_cc: FourCCVideo::BGRA.into(),
            line_stride: self.stride,
            data: &self.data,
        })
    }
}

/// Checks buffers the same way the OpenCV window does, without opening one
pub struct FakeDisplay {
    log: EventLog,
    keys: VecDeque<Option<i32>>,
}

impl FakeDisplay {
    pub fn new(log: &EventLog) -> Self {
        Self::with_keys(log, vec![])
    }

    /// `keys` are returned by successive event pumps, after that no key is pressed
    pub fn with_keys(log: &EventLog, keys: Vec<Option<i32>>) -> Self {
        FakeDisplay {
            log: log.clone(),
            keys: keys.into(),
        }
    }
}

impl DisplaySurface for FakeDisplay {
    type Image = Resolution;

    fn decode(&mut self, view: &VideoView<'_>) -> Result<Resolution, DisplayError> {
        self.log.push(Event::Decode {
            width: view.resolution.x,
            height: view.resolution.y,
        });
        let layout = PixelLayout::for_four_cc(view.four_cc)?;
        pack_rows(view, layout.bytes_per_pixel)?;
        Ok(view.resolution)
    }

    fn show(&mut self, _image: &Resolution) -> Result<(), DisplayError> {
        self.log.push(Event::Show);
        Ok(())
    }

    fn pump_events(&mut self, _wait: Duration) -> Result<Option<i32>, DisplayError> {
        self.log.push(Event::PumpEvents);
        Ok(self.keys.pop_front().flatten())
    }
}

#[derive(Clone)]
struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a debug level subscriber and returns its result and everything it logged
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = SharedWriter(buffer.clone());
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8_lossy(&buffer.lock().unwrap()).into_owned();
    (result, output)
}
