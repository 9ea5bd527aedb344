//! Shared fixtures: a manual clock and recording collaborators.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use interact_core::{ActorId, EntityId, Timestamp};
use interact_runtime::{
    ActionExecutor, Clock, Economy, Engine, EngineConfig, ExecError, Messenger, WithdrawError,
};

/// Base timestamp all scenarios start from (an arbitrary wall-clock moment).
pub const T0: Timestamp = 1_700_000_000_000;

static TRACING: Once = Once::new();

/// Installs a test subscriber once so `RUST_LOG` controls scenario output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn actor() -> ActorId {
    ActorId::new("Steve")
}

/// Clock the tests advance by hand.
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicU64::new(start),
        })
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Executor that records every call; payloads containing `boom` fail.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, kind: &str, payload: &str) -> Result<(), ExecError> {
        if payload.contains("boom") {
            return Err(ExecError::new("simulated platform failure"));
        }
        self.calls.lock().unwrap().push(format!("{kind}:{payload}"));
        Ok(())
    }
}

#[async_trait]
impl ActionExecutor for RecordingExecutor {
    async fn console_command(&self, command: &str) -> Result<(), ExecError> {
        self.record("console", command)
    }

    async fn actor_command(&self, actor: &ActorId, command: &str) -> Result<(), ExecError> {
        self.record("player", &format!("{actor}/{command}"))
    }

    async fn server_switch(&self, actor: &ActorId, target: &str) -> Result<(), ExecError> {
        self.record("server", &format!("{actor}/{target}"))
    }

    async fn chat_message(&self, actor: &ActorId, text: &str) -> Result<(), ExecError> {
        self.record("message", &format!("{actor}/{text}"))
    }

    async fn sound_cue(&self, actor: &ActorId, id: &str) -> Result<(), ExecError> {
        self.record("sound", &format!("{actor}/{id}"))
    }
}

/// Economy with a single shared balance, recording every withdrawal.
pub struct TestEconomy {
    balance: Mutex<f64>,
    withdrawals: Mutex<Vec<f64>>,
}

impl TestEconomy {
    pub fn with_balance(balance: f64) -> Arc<Self> {
        Arc::new(Self {
            balance: Mutex::new(balance),
            withdrawals: Mutex::new(Vec::new()),
        })
    }

    pub fn balance(&self) -> f64 {
        *self.balance.lock().unwrap()
    }

    pub fn withdrawals(&self) -> Vec<f64> {
        self.withdrawals.lock().unwrap().clone()
    }
}

#[async_trait]
impl Economy for TestEconomy {
    async fn withdraw(&self, _actor: &ActorId, amount: f64) -> Result<(), WithdrawError> {
        let mut balance = self.balance.lock().unwrap();
        if *balance < amount {
            return Err(WithdrawError::InsufficientFunds);
        }
        *balance -= amount;
        self.withdrawals.lock().unwrap().push(amount);
        Ok(())
    }
}

/// Messenger that records confirmation prompts.
#[derive(Default)]
pub struct RecordingMessenger {
    prompts: Mutex<Vec<(ActorId, EntityId, f64)>>,
}

impl RecordingMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn prompts(&self) -> Vec<(ActorId, EntityId, f64)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn prompt_confirmation(&self, actor: &ActorId, entity: EntityId, price: f64) {
        self.prompts.lock().unwrap().push((actor.clone(), entity, price));
    }
}

/// A fully wired engine plus handles to its recording collaborators.
pub struct TestRig {
    pub engine: Engine,
    pub clock: Arc<ManualClock>,
    pub executor: Arc<RecordingExecutor>,
    pub economy: Arc<TestEconomy>,
    pub messenger: Arc<RecordingMessenger>,
}

impl TestRig {
    pub fn new(config: EngineConfig, balance: f64) -> Self {
        init_tracing();
        let clock = ManualClock::new(T0);
        let executor = RecordingExecutor::new();
        let economy = TestEconomy::with_balance(balance);
        let messenger = RecordingMessenger::new();

        let engine = Engine::builder()
            .config(config)
            .executor(executor.clone())
            .economy(economy.clone())
            .messenger(messenger.clone())
            .clock(clock.clone())
            .build()
            .expect("engine should assemble");

        Self {
            engine,
            clock,
            executor,
            economy,
            messenger,
        }
    }
}
