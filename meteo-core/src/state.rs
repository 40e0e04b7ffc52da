//! Screen state for the weather view and the controller that drives it.
//!
//! The state lives in a single `watch` slot: the controller is the only
//! writer, any number of observers can `subscribe()`.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;

use crate::{
    error::LocationError, location::Coordinates, mapper::map_forecast, model::Weather,
    provider::ForecastProvider,
};

pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error while loading weather data";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherState {
    #[default]
    Idle,
    PermissionRequired,
    Loading,
    Success(Weather),
    Error(String),
}

impl WeatherState {
    pub fn name(&self) -> &'static str {
        match self {
            WeatherState::Idle => "idle",
            WeatherState::PermissionRequired => "permission_required",
            WeatherState::Loading => "loading",
            WeatherState::Success(_) => "success",
            WeatherState::Error(_) => "error",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WeatherState::Loading)
    }

    pub fn weather(&self) -> Option<&Weather> {
        match self {
            WeatherState::Success(weather) => Some(weather),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct WeatherController {
    provider: Arc<dyn ForecastProvider>,
    state: watch::Sender<WeatherState>,
    // Bumped by every transition; a fetch only publishes its result if no
    // other transition happened while it was awaiting the provider.
    generation: AtomicU64,
}

impl WeatherController {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        let (state, _) = watch::channel(WeatherState::Idle);
        Self {
            provider,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> WeatherState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.state.subscribe()
    }

    pub fn request_permission(&self) {
        self.transition(WeatherState::PermissionRequired);
    }

    pub fn reset(&self) {
        self.transition(WeatherState::Idle);
    }

    /// Route a failure to obtain the device position into the state slot.
    pub fn location_failed(&self, error: LocationError) {
        match error {
            LocationError::PermissionDenied => self.request_permission(),
            other => {
                self.transition(WeatherState::Error(other.to_string()));
            }
        }
    }

    /// Fetch and map the forecast for `latitude`/`longitude`.
    ///
    /// Overlapping calls are allowed; only the most recent one publishes its
    /// outcome.
    pub async fn fetch(&self, latitude: f64, longitude: f64, place_name: &str) {
        let generation = self.transition(WeatherState::Loading);

        let outcome = match Coordinates::new(latitude, longitude) {
            Ok(coordinates) => self
                .provider
                .fetch_forecast(coordinates)
                .await
                .map(|raw| map_forecast(raw, place_name))
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let next = match outcome {
            Ok(weather) => {
                tracing::info!(location = %weather.location, "weather loaded");
                WeatherState::Success(weather)
            }
            Err(message) => {
                tracing::warn!(error = %message, "weather fetch failed");
                WeatherState::Error(error_message(message))
            }
        };

        // Check and publish under the channel's write lock so a transition
        // cannot slip in between.
        let published = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        });
        if !published {
            tracing::debug!(generation, "discarding result of superseded fetch");
        }
    }

    fn transition(&self, next: WeatherState) -> u64 {
        let name = next.name();
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = next;
        });
        tracing::debug!(generation, state = name, "state transition");
        generation
    }
}

/// Message stored in [`WeatherState::Error`]; blank text gets a generic one.
fn error_message(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ForecastError,
        model::{RawCurrent, RawDaily, RawForecastResponse, RawHourly},
    };
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::{collections::VecDeque, sync::Mutex};
    use tokio::sync::oneshot;

    fn raw(code: i32) -> RawForecastResponse {
        RawForecastResponse {
            latitude: 1.0,
            longitude: 2.0,
            timezone: "GMT".to_string(),
            current: RawCurrent {
                time: None,
                temperature_2m: 10.0,
                apparent_temperature: 9.0,
                relative_humidity_2m: 50,
                weather_code: code,
                wind_speed_10m: 3.0,
                uv_index: 1.0,
                precipitation: 0.0,
                is_day: 1,
                european_aqi: Some(10),
            },
            hourly: RawHourly::default(),
            daily: RawDaily::default(),
        }
    }

    type Reply = Result<RawForecastResponse, ForecastError>;

    /// Provider whose calls resolve only when the test sends a reply.
    #[derive(Debug, Default)]
    struct ScriptedProvider {
        pending: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    }

    impl ScriptedProvider {
        fn expect_call(&self) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl ForecastProvider for ScriptedProvider {
        async fn fetch_forecast(&self, _: Coordinates) -> Reply {
            let rx = self.pending.lock().unwrap().pop_front().expect("unexpected call");
            rx.await.expect("reply sender dropped")
        }
    }

    #[derive(Debug)]
    struct FixedProvider(fn() -> Reply);

    #[async_trait]
    impl ForecastProvider for FixedProvider {
        async fn fetch_forecast(&self, _: Coordinates) -> Reply {
            (self.0)()
        }
    }

    #[test]
    fn starts_idle() {
        let controller = WeatherController::new(Arc::new(FixedProvider(|| Ok(raw(0)))));
        assert_eq!(controller.state(), WeatherState::Idle);
    }

    #[test]
    fn permission_and_reset_from_any_state() {
        let controller = WeatherController::new(Arc::new(FixedProvider(|| Ok(raw(0)))));

        controller.request_permission();
        assert_eq!(controller.state(), WeatherState::PermissionRequired);

        controller.reset();
        assert_eq!(controller.state(), WeatherState::Idle);
    }

    #[test]
    fn location_failures_are_routed() {
        let controller = WeatherController::new(Arc::new(FixedProvider(|| Ok(raw(0)))));

        controller.location_failed(LocationError::PermissionDenied);
        assert_eq!(controller.state(), WeatherState::PermissionRequired);

        controller.location_failed(LocationError::Timeout);
        assert_eq!(
            controller.state(),
            WeatherState::Error("Location request timed out".to_string())
        );
    }

    #[tokio::test]
    async fn successful_fetch_publishes_weather() {
        let controller = WeatherController::new(Arc::new(FixedProvider(|| Ok(raw(95)))));
        controller.fetch(1.0, 2.0, "Here").await;

        let state = controller.state();
        let weather = state.weather().expect("expected success");
        assert_eq!(weather.location, "Here");
        assert_eq!(weather.weather_description, "Thunderstorm");
    }

    #[tokio::test]
    async fn failed_fetch_publishes_message() {
        let controller = WeatherController::new(Arc::new(FixedProvider(|| {
            Err(ForecastError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            })
        })));
        controller.fetch(1.0, 2.0, "Here").await;

        match controller.state() {
            WeatherState::Error(message) => assert!(message.contains("500")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_coordinates_become_error_without_calling_provider() {
        let provider = Arc::new(ScriptedProvider::default());
        let controller = WeatherController::new(provider);
        controller.fetch(123.0, 2.0, "Nowhere").await;

        assert!(matches!(controller.state(), WeatherState::Error(m) if m.contains("latitude")));
    }

    #[tokio::test]
    async fn observers_see_loading_then_result() {
        let provider = Arc::new(ScriptedProvider::default());
        let reply = provider.expect_call();
        let controller = Arc::new(WeatherController::new(provider));
        let mut rx = controller.subscribe();

        let task = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.fetch(1.0, 2.0, "Here").await }
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());

        reply.send(Ok(raw(0))).unwrap();
        task.await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().weather().is_some());
    }

    #[tokio::test]
    async fn second_fetch_wins_even_if_first_resolves_last() {
        let provider = Arc::new(ScriptedProvider::default());
        let first = provider.expect_call();
        let second = provider.expect_call();
        let controller = Arc::new(WeatherController::new(provider));

        let first_task = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.fetch(1.0, 2.0, "First").await }
        });
        tokio::task::yield_now().await;
        while controller.generation.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }

        let second_task = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.fetch(3.0, 4.0, "Second").await }
        });
        while controller.generation.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        second.send(Ok(raw(3))).unwrap();
        second_task.await.unwrap();
        first.send(Ok(raw(0))).unwrap();
        first_task.await.unwrap();

        let state = controller.state();
        let weather = state.weather().expect("expected success");
        assert_eq!(weather.location, "Second");
        assert_eq!(weather.weather_code, 3);
    }

    #[test]
    fn blank_error_text_gets_generic_message() {
        assert_eq!(error_message(String::new()), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(error_message("  ".to_string()), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(error_message("timed out".to_string()), "timed out");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn reset_racing_a_fetch_on_other_threads_always_wins() {
        let controller = Arc::new(WeatherController::new(Arc::new(FixedProvider(|| {
            Ok(raw(0))
        }))));

        for round in 0..2_000 {
            let loading = controller.generation.load(Ordering::SeqCst) + 1;

            let fetch = tokio::spawn({
                let controller = Arc::clone(&controller);
                async move { controller.fetch(1.0, 2.0, "Here").await }
            });
            let reset = tokio::spawn({
                let controller = Arc::clone(&controller);
                async move {
                    while controller.generation.load(Ordering::SeqCst) < loading {
                        tokio::task::yield_now().await;
                    }
                    controller.reset();
                }
            });

            fetch.await.unwrap();
            reset.await.unwrap();
            assert_eq!(controller.state(), WeatherState::Idle, "round {round}");
        }
    }

    #[tokio::test]
    async fn reset_during_fetch_is_not_overwritten() {
        let provider = Arc::new(ScriptedProvider::default());
        let reply = provider.expect_call();
        let controller = Arc::new(WeatherController::new(provider));

        let task = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.fetch(1.0, 2.0, "Here").await }
        });
        while !controller.state().is_loading() {
            tokio::task::yield_now().await;
        }

        controller.reset();
        reply.send(Ok(raw(0))).unwrap();
        task.await.unwrap();

        assert_eq!(controller.state(), WeatherState::Idle);
    }
}
