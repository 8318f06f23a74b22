use clap::Parser;

/// The fully parsed command line for one run. Built once, never mutated.
#[derive(Parser, Debug, Default)]
#[command(
    name = "javcli",
    version,
    about = "Query AV catalog sites by id, performer, ranking or preview video"
)]
pub struct Options {
    /// Catalog id, looked up via JavBus
    #[arg(long = "av1", value_name = "ID", default_value = "")]
    pub av1: String,

    /// Catalog id, looked up via Sukebei
    #[arg(long = "av2", value_name = "ID", default_value = "")]
    pub av2: String,

    /// Keep only subtitled/HD magnets
    #[arg(long = "nc")]
    pub nice: bool,

    /// Keep only uncensored magnets
    #[arg(long = "uc")]
    pub uncensored: bool,

    /// Performer name, list their top-rated works (DMM)
    #[arg(long = "sr", value_name = "NAME", default_value = "")]
    pub search_rated: String,

    /// Performer name, list their newest catalog ids (JavBus)
    #[arg(long = "srn", value_name = "NAME", default_value = "")]
    pub search_new: String,

    /// Catalog id, fetch its preview video via DMM
    #[arg(long = "pv1", value_name = "ID", default_value = "")]
    pub preview_dmm: String,

    /// Catalog id, fetch its preview video via Avgle
    #[arg(long = "pv2", value_name = "ID", default_value = "")]
    pub preview_avgle: String,

    /// Show the DMM actress ranking top 25
    #[arg(long = "tp")]
    pub top_stars: bool,

    /// Proxy server address, falls back to the http_proxy environment value
    #[arg(short = 'p', long = "proxy", value_name = "ADDR", default_value = "")]
    pub proxy: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSite {
    JavBus,
    Sukebei,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSite {
    Dmm,
    Avgle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    TopRated,
    Newest,
}

/// The single action one invocation performs.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    LookupById {
        site: LookupSite,
        id: String,
        nice_only: bool,
        uncensored_only: bool,
    },
    SearchByStar {
        mode: SearchMode,
        name: String,
    },
    TopStars,
    PreviewVideo {
        site: PreviewSite,
        id: String,
    },
    ShowHelp,
}

impl Operation {
    /// Derive the one operation to run. First match wins, in this fixed
    /// order: av1, av2, tp, sr/srn (sr first), pv1, pv2.
    pub fn from_options(opts: &Options) -> Operation {
        if !opts.av1.is_empty() {
            Operation::LookupById {
                site: LookupSite::JavBus,
                id: opts.av1.clone(),
                nice_only: opts.nice,
                uncensored_only: opts.uncensored,
            }
        } else if !opts.av2.is_empty() {
            Operation::LookupById {
                site: LookupSite::Sukebei,
                id: opts.av2.clone(),
                nice_only: opts.nice,
                uncensored_only: opts.uncensored,
            }
        } else if opts.top_stars {
            Operation::TopStars
        } else if !opts.search_rated.is_empty() {
            Operation::SearchByStar {
                mode: SearchMode::TopRated,
                name: opts.search_rated.clone(),
            }
        } else if !opts.search_new.is_empty() {
            Operation::SearchByStar {
                mode: SearchMode::Newest,
                name: opts.search_new.clone(),
            }
        } else if !opts.preview_dmm.is_empty() {
            Operation::PreviewVideo {
                site: PreviewSite::Dmm,
                id: opts.preview_dmm.clone(),
            }
        } else if !opts.preview_avgle.is_empty() {
            Operation::PreviewVideo {
                site: PreviewSite::Avgle,
                id: opts.preview_avgle.clone(),
            }
        } else {
            Operation::ShowHelp
        }
    }
}

const MULTI_CHAR_FLAGS: [&str; 9] = ["av1", "av2", "nc", "uc", "sr", "srn", "pv1", "pv2", "tp"];

/// Rewrite the historical single-dash spellings (`-av1 ABC-123`) to the long
/// forms clap understands (`--av1 ABC-123`). clap short flags are single
/// characters, so these cannot be registered directly. `-p` is untouched.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            if let Some(rest) = arg.strip_prefix('-') {
                if !rest.starts_with('-') {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if MULTI_CHAR_FLAGS.contains(&name) {
                        return format!("-{}", arg);
                    }
                }
            }
            arg
        })
        .collect()
}
