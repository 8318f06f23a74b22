use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use javcli::command::{normalize_args, Operation, Options};
use javcli::dispatch::{resolve_proxy, Dispatcher, HttpFactory, LogSink};
use javcli::logging;

fn main() -> Result<()> {
    let args = normalize_args(std::env::args());
    let options = Options::parse_from(args);

    logging::init(&logging::default_dir())?;

    let operation = Operation::from_options(&options);
    let proxy = resolve_proxy(&options.proxy, std::env::var("http_proxy").ok().as_deref());

    let factory = HttpFactory::new(&proxy)?;
    let mut sink = LogSink;
    let usage = Options::command().render_help().to_string();
    let mut dispatcher = Dispatcher::new(&factory, &mut sink, usage);
    dispatcher.run(&operation);

    // Provider failures are logged, never turned into a non-zero exit: this
    // is a single-shot reporting tool.
    Ok(())
}
