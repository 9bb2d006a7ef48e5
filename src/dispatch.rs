//! Intent → counting-service call → screen.

use crate::screen::{self, ScreenState};
use crate::service::{CountingService, Request};

/// Screens produced by one dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// Shown right away: `Result` on success, `ErrorMsg` otherwise.
    pub screen: ScreenState,
    /// Fresh home screen, only after a success whose stats call worked.
    pub home: Option<ScreenState>,
}

pub struct Dispatcher<S> {
    service: S,
}

impl<S: CountingService> Dispatcher<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&mut self) -> &mut S {
        &mut self.service
    }

    /// Perform `request` once. No retry: a failure becomes an error screen.
    pub async fn dispatch(&mut self, request: Request) -> Dispatch {
        let outcome = match request {
            Request::Register(drink) => self.service.register(drink).await,
            Request::Undo => self.service.undo().await,
        };

        match outcome {
            Ok(reply) if reply.success => {
                info!("{} ok: {}", request, reply.message.as_str());
                let home = self.refresh_home().await;
                Dispatch {
                    screen: ScreenState::Result {
                        ok: true,
                        text: reply.message,
                    },
                    home,
                }
            }
            Ok(reply) => {
                warn!("{} rejected: {}", request, reply.message.as_str());
                Dispatch {
                    screen: ScreenState::ErrorMsg {
                        text: screen::format(format_args!("Failed: {}", reply.message)),
                    },
                    home: None,
                }
            }
            Err(e) => {
                warn!("{} failed: {}", request, e);
                Dispatch {
                    screen: ScreenState::ErrorMsg {
                        text: screen::format(format_args!("Error: {}", e)),
                    },
                    home: None,
                }
            }
        }
    }

    /// Home screen from the current stats, or `None` if they are unavailable.
    pub async fn refresh_home(&mut self) -> Option<ScreenState> {
        match self.service.stats().await {
            Ok(stats) => Some(ScreenState::Home {
                teas: stats.tea,
                coffees: stats.coffee,
            }),
            Err(e) => {
                warn!("stats refresh failed: {}", e);
                None
            }
        }
    }
}
