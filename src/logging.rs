use std::fs::OpenOptions;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::LogConfig;
use crate::fmt;
use crate::Error;

const SEQ_TIMEOUT: Duration = Duration::from_secs(5);

/// Keeps the Seq worker alive. Dropping it posts every queued event and joins
/// the worker, so hold it until the last log line of the run.
pub struct LogGuard {
    _seq: Option<SeqWorker>,
}

pub fn init(config: &LogConfig) -> Result<LogGuard, Error> {
    // The local offset cannot always be determined; fall back to UTC rather than fail.
    let timer = OffsetTime::local_rfc_3339()
        .unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339));

    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let directives = ["hyper=warn", "hyper_util=warn", "reqwest=warn", "h2=warn"];

    for directive in directives {
        if let Ok(parsed) = directive.parse::<Directive>() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    let stdout_layer = default_layer()
        .with_writer(std::io::stdout)
        .with_timer(timer.clone());

    let text_file_layer = match &config.path {
        Some(path) => {
            let text_file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                default_layer()
                    .pretty()
                    .with_writer(Arc::new(text_file))
                    .with_timer(timer.clone())
                    .with_ansi(false),
            )
        }
        None => None,
    };

    let json_file_layer = match &config.json_path {
        Some(path) => {
            let json_file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                default_layer()
                    .json()
                    .with_writer(Arc::new(json_file))
                    .with_timer(timer)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    let (seq_layer, seq_worker) = match &config.seq_endpoint {
        Some(endpoint) => {
            let (layer, worker) = spawn_seq(endpoint.clone());
            (Some(layer), Some(worker))
        }
        None => (None, None),
    };

    Registry::default()
        .with(env_filter)
        .with(stdout_layer)
        .with(text_file_layer)
        .with(json_file_layer)
        .with(seq_layer)
        .try_init()?;

    Ok(LogGuard { _seq: seq_worker })
}

fn default_layer<S>() -> tracing_subscriber::fmt::Layer<S>
where
    S: Subscriber,
{
    tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
}

enum SeqMessage {
    Event(String),
    Shutdown,
}

/// Ships each event to a Seq server in CLEF form, through a single worker thread.
struct SeqLayer {
    sender: Sender<SeqMessage>,
}

struct SeqWorker {
    sender: Sender<SeqMessage>,
    handle: Option<JoinHandle<()>>,
}

impl Drop for SeqWorker {
    fn drop(&mut self) {
        // Queued ahead of Shutdown, so everything already logged is posted first.
        let _ = self.sender.send(SeqMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn spawn_seq(endpoint: String) -> (SeqLayer, SeqWorker) {
    let (sender, receiver) = mpsc::channel();

    let handle = std::thread::spawn(move || {
        let agent = ureq::AgentBuilder::new().timeout(SEQ_TIMEOUT).build();
        for message in receiver {
            match message {
                SeqMessage::Event(json_string) => post_seq_event(&agent, &endpoint, &json_string),
                SeqMessage::Shutdown => break,
            }
        }
    });

    (
        SeqLayer {
            sender: sender.clone(),
        },
        SeqWorker {
            sender,
            handle: Some(handle),
        },
    )
}

fn post_seq_event(agent: &ureq::Agent, endpoint: &str, json_string: &str) {
    match agent
        .post(endpoint)
        .set("Content-Type", "application/vnd.serilog.clef")
        .send_string(json_string)
    {
        Ok(_) => {}
        Err(ureq::Error::Status(code, response)) => {
            eprintln!(
                "Seq rejected log event (HTTP {}): {}",
                code,
                response.into_string().unwrap_or_default()
            );
        }
        Err(e) => {
            eprintln!("Failed to send log to Seq: {}", e);
        }
    }
}

struct SeqVisitor {
    fields: serde_json::Map<String, Value>,
}

impl SeqVisitor {
    fn new() -> Self {
        Self {
            fields: serde_json::Map::new(),
        }
    }
}

impl Visit for SeqVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), json!(fmt!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }
}

fn seq_level(level: &tracing::Level) -> &'static str {
    match *level {
        tracing::Level::TRACE => "Verbose",
        tracing::Level::DEBUG => "Debug",
        tracing::Level::INFO => "Information",
        tracing::Level::WARN => "Warning",
        tracing::Level::ERROR => "Error",
    }
}

impl<S: Subscriber> Layer<S> for SeqLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = SeqVisitor::new();
        event.record(&mut visitor);

        let message_template = visitor
            .fields
            .remove("message")
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| fmt!("{}", metadata.name()));

        let mut payload = json!({
            "@t": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            "@mt": message_template,
            "@l": seq_level(metadata.level()),
            "SourceContext": metadata.target(),
        });

        if let Some(obj) = payload.as_object_mut() {
            if let Some(file) = metadata.file() {
                obj.insert("SourceFile".to_string(), json!(file));
            }
            if let Some(line) = metadata.line() {
                obj.insert("SourceLine".to_string(), json!(line));
            }
            for (key, value) in visitor.fields {
                obj.insert(key, value);
            }
        }

        let _ = self.sender.send(SeqMessage::Event(payload.to_string()));
    }
}
