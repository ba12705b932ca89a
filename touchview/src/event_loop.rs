//! Listen loop: poll the gesture endpoint on a timer and drive the camera.

use crate::config::Config;
use nalgebra::Point3;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::select;
use tokio::time::{interval, MissedTickBehavior};
use touch_input::{
    pump_once, CameraControl, CameraGestureHandler, DispatchOutcome, GestureDispatcher,
    PumpOutcome, SceneCamera,
};
use touch_protocol::GestureEndpoint;
use tracing::{debug, error, info, warn};

/// Dispatcher driving the reference camera.
pub type CameraDispatcher = GestureDispatcher<CameraGestureHandler<SceneCamera>>;

/// Counters reported when the listener stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Frames decoded and dispatched.
    pub frames: u64,
    /// Datagrams discarded as undecodable.
    pub decode_errors: u64,
    /// Frames whose gesture name matched no event.
    pub unrecognized: u64,
    /// Redraw requests issued by the camera handlers.
    pub renders: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, {} decode errors, {} unknown gestures, {} redraws",
            self.frames, self.decode_errors, self.unrecognized, self.renders
        )
    }
}

/// Endpoint plus dispatcher, advanced one poll at a time.
pub struct Listener {
    endpoint: GestureEndpoint,
    dispatcher: CameraDispatcher,
    summary: Summary,
}

impl Listener {
    /// Build the camera and dispatcher from `config` and open the endpoint.
    ///
    /// A bind failure is logged and the listener runs without gestures.
    pub fn new(config: &Config) -> Self {
        let mut endpoint = GestureEndpoint::new();
        if config.gestures.enabled {
            match endpoint.initialize(&config.endpoint.host, config.endpoint.port) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => error!("Gesture input unavailable: {}", e),
                Err(e) => warn!("{}", e),
            }
        } else {
            info!("Gesture input disabled by configuration");
        }
        Self::with_endpoint(endpoint, config)
    }

    /// Use an endpoint the caller has already set up.
    pub fn with_endpoint(endpoint: GestureEndpoint, config: &Config) -> Self {
        let handler =
            CameraGestureHandler::with_config(config.camera.build_camera(), config.gesture_config());
        Self {
            endpoint,
            dispatcher: GestureDispatcher::new(handler),
            summary: Summary::default(),
        }
    }

    pub fn endpoint(&self) -> &GestureEndpoint {
        &self.endpoint
    }

    pub fn dispatcher(&self) -> &CameraDispatcher {
        &self.dispatcher
    }

    /// Access the dispatcher, e.g. to register observers.
    pub fn dispatcher_mut(&mut self) -> &mut CameraDispatcher {
        &mut self.dispatcher
    }

    pub fn camera(&self) -> &SceneCamera {
        self.dispatcher.defaults().camera()
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Poll once and dispatch.
    pub fn tick(&mut self) -> PumpOutcome {
        let renders_before = self.camera().render_count();
        let outcome = pump_once(&mut self.endpoint, &mut self.dispatcher);

        match &outcome {
            PumpOutcome::Idle => {}
            PumpOutcome::Discarded(_) => self.summary.decode_errors += 1,
            PumpOutcome::Dispatched(dispatched) => {
                self.summary.frames += 1;
                if *dispatched == DispatchOutcome::Unrecognized {
                    self.summary.unrecognized += 1;
                }
            }
        }

        let renders = self.camera().render_count();
        if renders != renders_before {
            self.summary.renders += renders - renders_before;
            let camera = self.camera();
            let (near, far) = camera.clipping_range();
            debug!(
                "camera position {} focal point {} clipping [{:.4}, {:.4}]",
                format_point(&camera.position()),
                format_point(&camera.focal_point()),
                near,
                far
            );
        }

        outcome
    }

    /// Tear down the endpoint and return the final counters.
    pub fn finish(mut self) -> Summary {
        self.endpoint.teardown();
        info!("Listener stopped: {}", self.summary);
        self.summary
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("endpoint", &self.endpoint)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

fn format_point(p: &Point3<f64>) -> String {
    format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)
}

/// Run the listen loop until `shutdown` completes.
pub async fn run<F>(config: Config, shutdown: F) -> Summary
where
    F: Future<Output = ()>,
{
    let listener = Listener::new(&config);
    run_listener(listener, config.poll_interval(), shutdown).await
}

/// Run an already constructed listener until `shutdown` completes.
pub async fn run_listener<F>(mut listener: Listener, poll_interval: Duration, shutdown: F) -> Summary
where
    F: Future<Output = ()>,
{
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    info!("Listening for gestures every {:?}", poll_interval);
    loop {
        select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            _ = ticker.tick() => {
                listener.tick();
            }
        }
    }

    listener.finish()
}
