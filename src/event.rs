use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, MouseEvent};

pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
}

/// Shared stop flag for the input thread.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    token: CancellationToken,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms.max(1));
        let token = CancellationToken::default();
        let thread_token = token.clone();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            while !thread_token.is_cancelled() {
                // Wait only for what is left of the current frame so key
                // bursts can't starve the tick.
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(crossterm::event::Event::Key(key)) => Some(Event::Key(key)),
                        Ok(crossterm::event::Event::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                        _ => None,
                    };
                    if let Some(ev) = forwarded {
                        if tx.send(ev).is_err() {
                            return;
                        }
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    last_tick = Instant::now();
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                }
            }
            tracing::debug!("input thread stopped");
        });

        Self { rx, token }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
