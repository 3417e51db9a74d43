//! Fixed answer vocabularies used by the wizard's selection fields.
//!
//! Answers are stored as the string ids the form posts (e.g. `"4"`, `"ja"`,
//! `"it-konsult"`). Each vocabulary knows its ids and Swedish labels, so a
//! selection is only "chosen" when its id belongs to the set.

/// A closed set of selectable answer values.
pub trait Choice: Sized + Copy + 'static {
    /// Every value, in display order.
    const ALL: &'static [Self];

    /// Stable id as stored in the answer state.
    fn id(self) -> &'static str;

    /// Human-readable (Swedish) label.
    fn label(self) -> &'static str;

    /// Look up a value by id. Surrounding whitespace is ignored.
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.iter().copied().find(|c| c.id() == value)
    }
}

/// True if `value` is a non-empty id from the vocabulary `C`.
pub fn is_choice<C: Choice>(value: &str) -> bool {
    C::parse(value).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl Choice for YesNo {
    const ALL: &'static [Self] = &[YesNo::Yes, YesNo::No];

    fn id(self) -> &'static str {
        match self {
            YesNo::Yes => "ja",
            YesNo::No => "nej",
        }
    }

    fn label(self) -> &'static str {
        match self {
            YesNo::Yes => "Ja",
            YesNo::No => "Nej",
        }
    }
}

/// 1–5 self-assessment scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scale {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Choice for Scale {
    const ALL: &'static [Self] = &[
        Scale::One,
        Scale::Two,
        Scale::Three,
        Scale::Four,
        Scale::Five,
    ];

    fn id(self) -> &'static str {
        match self {
            Scale::One => "1",
            Scale::Two => "2",
            Scale::Three => "3",
            Scale::Four => "4",
            Scale::Five => "5",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Scale::One => "1 – Inte alls",
            Scale::Two => "2 – I liten grad",
            Scale::Three => "3 – Delvis",
            Scale::Four => "4 – I hög grad",
            Scale::Five => "5 – Helt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitTrend {
    Growing,
    Stable,
    Declining,
}

impl Choice for ProfitTrend {
    const ALL: &'static [Self] = &[
        ProfitTrend::Growing,
        ProfitTrend::Stable,
        ProfitTrend::Declining,
    ];

    fn id(self) -> &'static str {
        match self {
            ProfitTrend::Growing => "vaxande",
            ProfitTrend::Stable => "stabil",
            ProfitTrend::Declining => "minskande",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ProfitTrend::Growing => "Växande",
            ProfitTrend::Stable => "Stabil",
            ProfitTrend::Declining => "Minskande",
        }
    }
}

/// Desired time until closing, in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleTimeline {
    WithinSixMonths,
    SixToTwelve,
    TwelveToTwentyFour,
    Later,
}

impl Choice for SaleTimeline {
    const ALL: &'static [Self] = &[
        SaleTimeline::WithinSixMonths,
        SaleTimeline::SixToTwelve,
        SaleTimeline::TwelveToTwentyFour,
        SaleTimeline::Later,
    ];

    fn id(self) -> &'static str {
        match self {
            SaleTimeline::WithinSixMonths => "0-6",
            SaleTimeline::SixToTwelve => "6-12",
            SaleTimeline::TwelveToTwentyFour => "12-24",
            SaleTimeline::Later => "24+",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SaleTimeline::WithinSixMonths => "Inom 6 månader",
            SaleTimeline::SixToTwelve => "6–12 månader",
            SaleTimeline::TwelveToTwentyFour => "1–2 år",
            SaleTimeline::Later => "Mer än 2 år",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Industry {
    ItConsulting,
    Construction,
    Retail,
    Restaurant,
    Manufacturing,
    Transport,
    Healthcare,
    Other,
}

impl Choice for Industry {
    const ALL: &'static [Self] = &[
        Industry::ItConsulting,
        Industry::Construction,
        Industry::Retail,
        Industry::Restaurant,
        Industry::Manufacturing,
        Industry::Transport,
        Industry::Healthcare,
        Industry::Other,
    ];

    fn id(self) -> &'static str {
        match self {
            Industry::ItConsulting => "it-konsult",
            Industry::Construction => "bygg",
            Industry::Retail => "handel",
            Industry::Restaurant => "restaurang",
            Industry::Manufacturing => "tillverkning",
            Industry::Transport => "transport",
            Industry::Healthcare => "vard",
            Industry::Other => "ovrigt",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Industry::ItConsulting => "IT & konsult",
            Industry::Construction => "Bygg & hantverk",
            Industry::Retail => "Handel & e-handel",
            Industry::Restaurant => "Restaurang & café",
            Industry::Manufacturing => "Tillverkning",
            Industry::Transport => "Transport & logistik",
            Industry::Healthcare => "Vård & omsorg",
            Industry::Other => "Övrigt",
        }
    }
}

/// What the owner wants to do after finishing the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Advisor,
    Valuation,
    SelfGuided,
}

impl Choice for NextStep {
    const ALL: &'static [Self] = &[NextStep::Advisor, NextStep::Valuation, NextStep::SelfGuided];

    fn id(self) -> &'static str {
        match self {
            NextStep::Advisor => "radgivare",
            NextStep::Valuation => "vardering",
            NextStep::SelfGuided => "sjalv",
        }
    }

    fn label(self) -> &'static str {
        match self {
            NextStep::Advisor => "Boka rådgivare",
            NextStep::Valuation => "Beställ värdering",
            NextStep::SelfGuided => "Fortsätt på egen hand",
        }
    }
}

/// Options for the non-operating assets multi-select (step 6).
pub const NON_OPERATING_ASSETS: &[&str] = &[
    "inga",
    "fastighet",
    "vardepapper",
    "overskottslikviditet",
    "fordon",
    "konst",
];

/// Options for the legal documents multi-select (step 7).
pub const LEGAL_DOCUMENTS: &[&str] = &[
    "bolagsordning",
    "aktieagaravtal",
    "hyresavtal",
    "kundavtal",
    "leverantorsavtal",
    "anstallningsavtal",
    "tillstand",
];

/// Options for the buyer types multi-select (step 8).
pub const BUYER_TYPES: &[&str] = &[
    "konkurrent",
    "privat-equity",
    "anstalld",
    "familj",
    "privatperson",
];
