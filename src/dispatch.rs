use anyhow::Result;

use crate::avgle::Avgle;
use crate::command::{LookupSite, Operation, PreviewSite, SearchMode};
use crate::dmm::Dmm;
use crate::http;
use crate::javbus::JavBus;
use crate::provider::{IdLookup, Outcome, Payload, PreviewVideo, StarRanking, StarSearch};
use crate::sukebei::Sukebei;
use crate::translate::{resolve_star_name, NameTranslator};
use crate::wiki::WikiTranslator;

/// Effective proxy address: explicit flag wins, then the environment value,
/// then none. Resolved once per invocation.
pub fn resolve_proxy(explicit: &str, env_value: Option<&str>) -> String {
    if !explicit.is_empty() {
        explicit.to_string()
    } else {
        env_value.unwrap_or("").to_string()
    }
}

/// Supplies the provider matching an operation. The production factory builds
/// HTTP-backed providers over the resolved proxy; tests substitute recorders.
pub trait ProviderFactory {
    fn id_lookup(&self, site: LookupSite) -> Box<dyn IdLookup>;
    fn star_search(&self, mode: SearchMode) -> Box<dyn StarSearch>;
    fn star_ranking(&self) -> Box<dyn StarRanking>;
    fn preview_video(&self, site: PreviewSite) -> Box<dyn PreviewVideo>;
    fn translator(&self) -> Box<dyn NameTranslator>;
}

/// Where results end up. Success payloads are logged verbatim; failure
/// payloads are diagnostic text and are deliberately dropped, only the code
/// is reported.
pub trait ReportSink {
    fn success(&mut self, payload: &Payload);
    fn failure(&mut self, code: u16);
    fn usage(&mut self, text: &str);
}

/// Production sink: routes through the process-wide tracing subscriber, so
/// every message reaches both the console and the log file.
pub struct LogSink;

impl ReportSink for LogSink {
    fn success(&mut self, payload: &Payload) {
        tracing::info!("{}", payload);
    }

    fn failure(&mut self, code: u16) {
        tracing::error!("{}: operation failed", code);
    }

    fn usage(&mut self, text: &str) {
        println!("{}", text);
    }
}

pub struct Dispatcher<'a> {
    factory: &'a dyn ProviderFactory,
    sink: &'a mut dyn ReportSink,
    usage: String,
}

impl<'a> Dispatcher<'a> {
    pub fn new(factory: &'a dyn ProviderFactory, sink: &'a mut dyn ReportSink, usage: String) -> Self {
        Dispatcher { factory, sink, usage }
    }

    /// Execute one operation end-to-end. Exactly one provider method is
    /// invoked, except for ShowHelp which performs no provider call.
    pub fn run(&mut self, op: &Operation) {
        match op {
            Operation::ShowHelp => {
                let usage = self.usage.clone();
                self.sink.usage(&usage);
            }
            Operation::LookupById {
                site,
                id,
                nice_only,
                uncensored_only,
            } => {
                let provider = self.factory.id_lookup(*site);
                self.report(provider.av_by_id(id, *nice_only, *uncensored_only));
            }
            Operation::SearchByStar { mode, name } => {
                let translator = self.factory.translator();
                let name = resolve_star_name(name, translator.as_ref());
                let provider = self.factory.star_search(*mode);
                self.report(provider.avs_by_star(&name));
            }
            Operation::TopStars => {
                let provider = self.factory.star_ranking();
                self.report(provider.top_stars());
            }
            Operation::PreviewVideo { site, id } => {
                let provider = self.factory.preview_video(*site);
                self.report(provider.pv_by_id(id));
            }
        }
    }

    fn report(&mut self, outcome: Outcome) {
        if outcome.is_success() {
            self.sink.success(&outcome.payload);
        } else {
            self.sink.failure(outcome.code);
        }
    }
}

/// The real provider wiring. One shared blocking client carries the resolved
/// proxy; each operation gets a fresh provider value over it.
pub struct HttpFactory {
    client: reqwest::blocking::Client,
}

impl HttpFactory {
    pub fn new(proxy_addr: &str) -> Result<Self> {
        Ok(HttpFactory {
            client: http::client(proxy_addr)?,
        })
    }
}

impl ProviderFactory for HttpFactory {
    fn id_lookup(&self, site: LookupSite) -> Box<dyn IdLookup> {
        match site {
            LookupSite::JavBus => Box::new(JavBus::new(self.client.clone())),
            LookupSite::Sukebei => Box::new(Sukebei::new(self.client.clone())),
        }
    }

    fn star_search(&self, mode: SearchMode) -> Box<dyn StarSearch> {
        match mode {
            SearchMode::TopRated => Box::new(Dmm::new(self.client.clone())),
            SearchMode::Newest => Box::new(JavBus::new(self.client.clone())),
        }
    }

    fn star_ranking(&self) -> Box<dyn StarRanking> {
        Box::new(Dmm::new(self.client.clone()))
    }

    fn preview_video(&self, site: PreviewSite) -> Box<dyn PreviewVideo> {
        match site {
            PreviewSite::Dmm => Box::new(Dmm::new(self.client.clone())),
            PreviewSite::Avgle => Box::new(Avgle::new(self.client.clone())),
        }
    }

    fn translator(&self) -> Box<dyn NameTranslator> {
        Box::new(WikiTranslator::new(self.client.clone()))
    }
}
