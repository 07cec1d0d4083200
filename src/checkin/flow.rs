use super::{CODE_LENGTH, CheckInApi, CheckInFailure, CheckInRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    Success,
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInState {
    Entering,
    Submitting,
    Resolved(CheckInOutcome),
}

type Callback = Box<dyn FnMut() + Send>;

pub struct CheckInFlow<A: CheckInApi> {
    api: A,
    event_id: String,
    user_id: String,
    code: String,
    state: CheckInState,
    open: bool,
    on_success: Option<Callback>,
    on_close: Option<Callback>,
}

impl<A: CheckInApi> CheckInFlow<A> {
    pub fn new(api: A, event_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            api,
            event_id: event_id.into(),
            user_id: user_id.into(),
            code: String::new(),
            state: CheckInState::Entering,
            open: true,
            on_success: None,
            on_close: None,
        }
    }

    /// Called once after a successful check-in, before the flow closes.
    pub fn on_success(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_close(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &CheckInState {
        &self.state
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The inline error to show, if the last attempt failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            CheckInState::Resolved(CheckInOutcome::Failure(message)) => Some(message),
            _ => None,
        }
    }

    /// Replace the entered code. Non-alphanumeric characters are dropped and
    /// input is cut at four characters. Ignored while a submission is in flight.
    pub fn set_code(&mut self, input: &str) {
        if !self.open || self.state == CheckInState::Submitting {
            return;
        }
        self.code = input
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(CODE_LENGTH)
            .collect();
        if self.error().is_some() {
            self.state = CheckInState::Entering;
        }
    }

    pub fn can_submit(&self) -> bool {
        self.open
            && self.state != CheckInState::Submitting
            && self.code.chars().count() == CODE_LENGTH
    }

    /// Send the code. Does nothing unless [`can_submit`](Self::can_submit).
    pub async fn submit(&mut self) -> &CheckInState {
        if !self.can_submit() {
            return &self.state;
        }

        self.state = CheckInState::Submitting;
        let request = CheckInRequest {
            event_id: self.event_id.clone(),
            user_id: self.user_id.clone(),
            code: self.code.clone(),
        };

        match self.api.submit(&request).await {
            Ok(()) => {
                self.state = CheckInState::Resolved(CheckInOutcome::Success);
                if let Some(callback) = self.on_success.as_mut() {
                    callback();
                }
                self.close();
            }
            Err(CheckInFailure { message }) => {
                self.state = CheckInState::Resolved(CheckInOutcome::Failure(message));
            }
        }

        &self.state
    }

    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Some(callback) = self.on_close.as_mut() {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Clone)]
    struct FakeApi {
        calls: Arc<AtomicUsize>,
        reply: Result<(), CheckInFailure>,
    }

    impl FakeApi {
        fn replying(reply: Result<(), CheckInFailure>) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                reply,
            }
        }
    }

    #[async_trait]
    impl CheckInApi for FakeApi {
        async fn submit(&self, _request: &CheckInRequest) -> Result<(), CheckInFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Callback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_for_callbacks = Arc::clone(&log);
        let make = move |name: &'static str| -> Callback {
            let log = Arc::clone(&log_for_callbacks);
            Box::new(move || log.lock().unwrap().push(name))
        };
        (log, make)
    }

    #[tokio::test]
    async fn short_or_long_codes_never_reach_the_server() {
        let api = FakeApi::replying(Ok(()));
        let calls = Arc::clone(&api.calls);
        let mut flow = CheckInFlow::new(api, "e1", "u1");

        flow.set_code("12");
        assert!(!flow.can_submit());
        flow.submit().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(flow.state(), &CheckInState::Entering);

        flow.set_code("12345");
        assert_eq!(flow.code(), "1234");
    }

    #[tokio::test]
    async fn invalid_code_keeps_the_flow_open() {
        let api = FakeApi::replying(Err(CheckInFailure::new("Invalid code")));
        let (log, make) = recorder();
        let mut flow = CheckInFlow::new(api, "e1", "u1")
            .on_success(make("success"))
            .on_close(make("close"));

        flow.set_code("9999");
        flow.submit().await;

        assert!(flow.is_open());
        assert_eq!(flow.error(), Some("Invalid code"));
        assert!(log.lock().unwrap().is_empty());

        flow.set_code("4821");
        assert_eq!(flow.error(), None);
        assert!(flow.can_submit());
    }

    #[tokio::test]
    async fn success_notifies_then_closes_exactly_once() {
        let api = FakeApi::replying(Ok(()));
        let calls = Arc::clone(&api.calls);
        let (log, make) = recorder();
        let mut flow = CheckInFlow::new(api, "e1", "u1")
            .on_success(make("success"))
            .on_close(make("close"));

        flow.set_code("4821");
        assert_eq!(
            flow.submit().await,
            &CheckInState::Resolved(CheckInOutcome::Success)
        );
        assert!(!flow.is_open());

        flow.submit().await;
        flow.close();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*log.lock().unwrap(), vec!["success", "close"]);
    }

    #[test]
    fn code_input_drops_punctuation() {
        let mut flow = CheckInFlow::new(FakeApi::replying(Ok(())), "e1", "u1");
        flow.set_code(" a-b 1 ");
        assert_eq!(flow.code(), "ab1");
    }
}
