use std::cell::RefCell;
use std::rc::Rc;

use javcli::command::{LookupSite, Operation, Options, PreviewSite, SearchMode};
use javcli::dispatch::{Dispatcher, ProviderFactory, ReportSink};
use javcli::provider::{IdLookup, Outcome, Payload, PreviewVideo, StarRanking, StarSearch};
use javcli::translate::{NameTranslator, Translation};

#[derive(Default)]
struct Calls {
    lookups: Vec<(LookupSite, String, bool, bool)>,
    searches: Vec<(SearchMode, String)>,
    rankings: usize,
    previews: Vec<(PreviewSite, String)>,
    translations: Vec<String>,
}

impl Calls {
    fn provider_total(&self) -> usize {
        self.lookups.len() + self.searches.len() + self.rankings + self.previews.len()
    }
}

struct MockFactory {
    calls: Rc<RefCell<Calls>>,
    outcome: Outcome,
    translation: Option<Translation>,
}

impl MockFactory {
    fn new(outcome: Outcome) -> Self {
        MockFactory {
            calls: Rc::new(RefCell::new(Calls::default())),
            outcome,
            translation: None,
        }
    }

    fn with_translation(mut self, translation: Translation) -> Self {
        self.translation = Some(translation);
        self
    }
}

struct MockLookup {
    site: LookupSite,
    calls: Rc<RefCell<Calls>>,
    outcome: Outcome,
}

impl IdLookup for MockLookup {
    fn av_by_id(&self, id: &str, nice_only: bool, uncensored_only: bool) -> Outcome {
        self.calls
            .borrow_mut()
            .lookups
            .push((self.site, id.to_string(), nice_only, uncensored_only));
        self.outcome.clone()
    }
}

struct MockSearch {
    mode: SearchMode,
    calls: Rc<RefCell<Calls>>,
    outcome: Outcome,
}

impl StarSearch for MockSearch {
    fn avs_by_star(&self, name: &str) -> Outcome {
        self.calls
            .borrow_mut()
            .searches
            .push((self.mode, name.to_string()));
        self.outcome.clone()
    }
}

struct MockRanking {
    calls: Rc<RefCell<Calls>>,
    outcome: Outcome,
}

impl StarRanking for MockRanking {
    fn top_stars(&self) -> Outcome {
        self.calls.borrow_mut().rankings += 1;
        self.outcome.clone()
    }
}

struct MockPreview {
    site: PreviewSite,
    calls: Rc<RefCell<Calls>>,
    outcome: Outcome,
}

impl PreviewVideo for MockPreview {
    fn pv_by_id(&self, id: &str) -> Outcome {
        self.calls
            .borrow_mut()
            .previews
            .push((self.site, id.to_string()));
        self.outcome.clone()
    }
}

struct MockTranslator {
    calls: Rc<RefCell<Calls>>,
    translation: Option<Translation>,
}

impl NameTranslator for MockTranslator {
    fn to_japanese(&self, name: &str) -> Option<Translation> {
        self.calls.borrow_mut().translations.push(name.to_string());
        self.translation.clone()
    }
}

impl ProviderFactory for MockFactory {
    fn id_lookup(&self, site: LookupSite) -> Box<dyn IdLookup> {
        Box::new(MockLookup {
            site,
            calls: Rc::clone(&self.calls),
            outcome: self.outcome.clone(),
        })
    }

    fn star_search(&self, mode: SearchMode) -> Box<dyn StarSearch> {
        Box::new(MockSearch {
            mode,
            calls: Rc::clone(&self.calls),
            outcome: self.outcome.clone(),
        })
    }

    fn star_ranking(&self) -> Box<dyn StarRanking> {
        Box::new(MockRanking {
            calls: Rc::clone(&self.calls),
            outcome: self.outcome.clone(),
        })
    }

    fn preview_video(&self, site: PreviewSite) -> Box<dyn PreviewVideo> {
        Box::new(MockPreview {
            site,
            calls: Rc::clone(&self.calls),
            outcome: self.outcome.clone(),
        })
    }

    fn translator(&self) -> Box<dyn NameTranslator> {
        Box::new(MockTranslator {
            calls: Rc::clone(&self.calls),
            translation: self.translation.clone(),
        })
    }
}

#[derive(Default)]
struct RecordingSink {
    infos: Vec<String>,
    errors: Vec<String>,
    usages: Vec<String>,
}

impl ReportSink for RecordingSink {
    fn success(&mut self, payload: &Payload) {
        self.infos.push(payload.to_string());
    }

    fn failure(&mut self, code: u16) {
        self.errors.push(format!("{}: operation failed", code));
    }

    fn usage(&mut self, text: &str) {
        self.usages.push(text.to_string());
    }
}

fn ok(text: &str) -> Outcome {
    Outcome::success(Payload::Text(text.into()))
}

fn run(factory: &MockFactory, op: &Operation) -> RecordingSink {
    let mut sink = RecordingSink::default();
    let mut dispatcher = Dispatcher::new(factory, &mut sink, "usage text".into());
    dispatcher.run(op);
    sink
}

#[test]
fn lookup_invokes_exactly_one_provider() {
    let factory = MockFactory::new(ok("X"));
    run(
        &factory,
        &Operation::LookupById {
            site: LookupSite::JavBus,
            id: "ABC-123".into(),
            nice_only: true,
            uncensored_only: false,
        },
    );
    let calls = factory.calls.borrow();
    assert_eq!(calls.provider_total(), 1);
    assert_eq!(
        calls.lookups,
        vec![(LookupSite::JavBus, "ABC-123".to_string(), true, false)]
    );
}

#[test]
fn av1_precedence_selects_javbus_path() {
    let mut options = Options::default();
    options.av1 = "A-1".into();
    options.av2 = "B-2".into();
    let op = Operation::from_options(&options);

    let factory = MockFactory::new(ok("X"));
    run(&factory, &op);
    let calls = factory.calls.borrow();
    assert_eq!(
        calls.lookups,
        vec![(LookupSite::JavBus, "A-1".to_string(), false, false)]
    );
}

#[test]
fn top_stars_invokes_ranking_only() {
    let factory = MockFactory::new(ok("ranking"));
    run(&factory, &Operation::TopStars);
    let calls = factory.calls.borrow();
    assert_eq!(calls.provider_total(), 1);
    assert_eq!(calls.rankings, 1);
}

#[test]
fn preview_invokes_matching_site() {
    let factory = MockFactory::new(ok("url"));
    run(
        &factory,
        &Operation::PreviewVideo {
            site: PreviewSite::Avgle,
            id: "ABC-123".into(),
        },
    );
    let calls = factory.calls.borrow();
    assert_eq!(calls.provider_total(), 1);
    assert_eq!(calls.previews, vec![(PreviewSite::Avgle, "ABC-123".to_string())]);
}

#[test]
fn show_help_performs_no_provider_calls() {
    let factory = MockFactory::new(ok("X"));
    let sink = run(&factory, &Operation::ShowHelp);
    assert_eq!(factory.calls.borrow().provider_total(), 0);
    assert_eq!(factory.calls.borrow().translations.len(), 0);
    assert_eq!(sink.usages, vec!["usage text"]);
}

#[test]
fn success_payload_reaches_info() {
    let factory = MockFactory::new(ok("X"));
    let sink = run(
        &factory,
        &Operation::PreviewVideo {
            site: PreviewSite::Dmm,
            id: "ABC-123".into(),
        },
    );
    assert_eq!(sink.infos, vec!["X"]);
    assert!(sink.errors.is_empty());
}

#[test]
fn failure_reports_code_and_discards_payload() {
    let factory = MockFactory::new(Outcome::failure(404, "ignored"));
    let sink = run(
        &factory,
        &Operation::LookupById {
            site: LookupSite::Sukebei,
            id: "ABC-123".into(),
            nice_only: false,
            uncensored_only: false,
        },
    );
    assert!(sink.infos.is_empty());
    assert_eq!(sink.errors.len(), 1);
    assert!(sink.errors[0].contains("404"));
    assert!(!sink.errors[0].contains("ignored"));
}

#[test]
fn native_script_name_skips_translation() {
    let factory = MockFactory::new(ok("list")).with_translation(Translation {
        title: "wrong".into(),
        lang: "ja".into(),
    });
    run(
        &factory,
        &Operation::SearchByStar {
            mode: SearchMode::Newest,
            name: "明日花キララ".into(),
        },
    );
    let calls = factory.calls.borrow();
    assert!(calls.translations.is_empty());
    assert_eq!(
        calls.searches,
        vec![(SearchMode::Newest, "明日花キララ".to_string())]
    );
}

#[test]
fn translated_name_is_passed_to_search() {
    let factory = MockFactory::new(ok("list")).with_translation(Translation {
        title: "明日花キララ".into(),
        lang: "ja".into(),
    });
    run(
        &factory,
        &Operation::SearchByStar {
            mode: SearchMode::TopRated,
            name: "明日花".into(),
        },
    );
    let calls = factory.calls.borrow();
    assert_eq!(calls.translations, vec!["明日花"]);
    assert_eq!(
        calls.searches,
        vec![(SearchMode::TopRated, "明日花キララ".to_string())]
    );
}

#[test]
fn failed_translation_falls_back_to_original() {
    let factory = MockFactory::new(ok("list"));
    run(
        &factory,
        &Operation::SearchByStar {
            mode: SearchMode::TopRated,
            name: "明日花".into(),
        },
    );
    let calls = factory.calls.borrow();
    assert_eq!(calls.translations, vec!["明日花"]);
    assert_eq!(
        calls.searches,
        vec![(SearchMode::TopRated, "明日花".to_string())]
    );
}
