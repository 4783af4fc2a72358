use std::fmt;

/// Project selector choosing which authoring-convention rule set applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Mode {
    #[value(name = "PT")]
    PT,
    #[value(name = "TD")]
    TD,
    #[value(name = "TR")]
    TR,
    #[value(name = "Vanilla")]
    Vanilla,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::PT => "PT",
            Mode::TD => "TD",
            Mode::TR => "TR",
            Mode::Vanilla => "Vanilla",
        };
        f.write_str(name)
    }
}
