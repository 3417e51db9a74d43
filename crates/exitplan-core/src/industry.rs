//! Industry-specific step content and the overlay that applies it.
//!
//! Overrides are keyed by (industry id, step id). Applying them never
//! touches the base list: an unknown industry gets the base slice back
//! borrowed, a known one gets a freshly built list.
//!
//! # Item splice
//!
//! An override's items replace the base items *by position*: with base
//! items `[a, b, c, d]` and override items `[x, y]` the result is
//! `[x, y, c, d]`. Titles are not matched.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{ItemDefinition, StepDefinition, Visual, bars, item, ring, stats, timeline};

/// A partial item. Fields left out become empty in the merged item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemOverride {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub details: Option<String>,
    pub visual: Option<Visual>,
}

impl ItemOverride {
    fn to_item(&self) -> ItemDefinition {
        ItemDefinition {
            title: self.title.clone().unwrap_or_default(),
            summary: self.summary.clone().unwrap_or_default(),
            details: self.details.clone().unwrap_or_default(),
            visual: self.visual.clone(),
        }
    }
}

impl From<ItemDefinition> for ItemOverride {
    fn from(item: ItemDefinition) -> Self {
        Self {
            title: Some(item.title),
            summary: Some(item.summary),
            details: Some(item.details),
            visual: item.visual,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepOverride {
    pub fact: Option<String>,
    pub items: Option<Vec<ItemOverride>>,
}

/// Industry id → step id → override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustryCatalog {
    overrides: HashMap<String, BTreeMap<u8, StepOverride>>,
}

static BUILTIN: LazyLock<IndustryCatalog> = LazyLock::new(build_builtin);

impl IndustryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> &'static IndustryCatalog {
        &BUILTIN
    }

    /// Parse a catalog from JSON shaped like `{"bygg": {"3": {"fact": "..."}}}`.
    pub fn from_json(json: &str) -> Result<Self, crate::CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, industry: &str, step: u8, override_: StepOverride) {
        self.overrides
            .entry(industry.to_string())
            .or_default()
            .insert(step, override_);
    }

    /// Layer `other` on top of this catalog. Its entries win per (industry, step).
    pub fn extend(&mut self, other: IndustryCatalog) {
        for (industry, steps) in other.overrides {
            self.overrides.entry(industry).or_default().extend(steps);
        }
    }

    pub fn has_overrides(&self, industry: &str) -> bool {
        self.overrides
            .get(industry.trim())
            .is_some_and(|steps| !steps.is_empty())
    }

    pub fn step_override(&self, industry: &str, step: u8) -> Option<&StepOverride> {
        self.overrides.get(industry.trim())?.get(&step)
    }

    /// Industry ids with overrides, sorted.
    pub fn industries(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.overrides.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Derive the step list for `industry`.
    ///
    /// Returns `base` itself when the industry has no overrides. Otherwise
    /// every step is cloned and overridden steps get the replacement fact
    /// and the positional item splice.
    pub fn steps_for<'a>(&self, industry: &str, base: &'a [StepDefinition]) -> Cow<'a, [StepDefinition]> {
        let Some(steps) = self.overrides.get(industry.trim()) else {
            debug!(industry, "no industry overrides, using base steps");
            return Cow::Borrowed(base);
        };
        debug!(industry, overridden = steps.len(), "applying industry overrides");
        Cow::Owned(
            base.iter()
                .map(|step| match steps.get(&step.id) {
                    Some(ov) => merge_step(step, ov),
                    None => step.clone(),
                })
                .collect(),
        )
    }
}

/// [`IndustryCatalog::steps_for`] against the built-in catalog.
pub fn get_industry_steps<'a>(industry: &str, base: &'a [StepDefinition]) -> Cow<'a, [StepDefinition]> {
    IndustryCatalog::builtin().steps_for(industry, base)
}

/// Apply one override to one base step.
pub fn merge_step(base: &StepDefinition, ov: &StepOverride) -> StepDefinition {
    let fact = ov.fact.clone().unwrap_or_else(|| base.fact.clone());
    let items = match &ov.items {
        Some(replacements) => replacements
            .iter()
            .map(ItemOverride::to_item)
            .chain(base.items.iter().skip(replacements.len()).cloned())
            .collect(),
        None => base.items.clone(),
    };
    StepDefinition {
        fact,
        items,
        ..base.clone()
    }
}

// ── Built-in overrides ──

fn fact(text: &str) -> StepOverride {
    StepOverride {
        fact: Some(text.to_string()),
        items: None,
    }
}

fn fact_and_items(text: &str, items: Vec<ItemDefinition>) -> StepOverride {
    StepOverride {
        fact: Some(text.to_string()),
        items: Some(items.into_iter().map(ItemOverride::from).collect()),
    }
}

fn items_only(items: Vec<ItemDefinition>) -> StepOverride {
    StepOverride {
        fact: None,
        items: Some(items.into_iter().map(ItemOverride::from).collect()),
    }
}

fn build_builtin() -> IndustryCatalog {
    let mut c = IndustryCatalog::new();

    // IT & konsult
    c.insert(
        "it-konsult",
        2,
        fact_and_items(
            "Konsultbolag värderas på debiteringsgrad, timpriser och hur stor del av intäkterna som är avtalade löpande uppdrag.",
            vec![item(
                "Affärsmodell",
                "Timdebitering, fastpris eller licens/SaaS?",
                "Återkommande licens- och förvaltningsintäkter värderas betydligt högre än timdebitering. Redovisa fördelningen mellan intäktstyperna.",
            )
            .with_visual(bars(&[("Tim", 55.0), ("Fastpris", 25.0), ("Förvaltning", 20.0)]))],
        ),
    );
    c.insert(
        "it-konsult",
        4,
        items_only(vec![
            item(
                "Ramavtal",
                "Hur stor del av beläggningen går via ramavtal?",
                "Ramavtal med offentlig sektor eller storföretag ger stabilitet men löper ofta ut. Ange slutdatum och möjlighet till förlängning.",
            ),
            item(
                "Konsultmäklare",
                "Uppdrag via mäklare ger lägre marginal.",
                "Visa andelen uppdrag som kommer direkt från slutkund. Direktrelationer är mer värda.",
            ),
        ]),
    );
    c.insert(
        "it-konsult",
        5,
        fact("I konsultbolag följer kunderna ofta personen, inte bolaget. Köpare kräver nästan alltid inlåsning av nyckelkonsulter."),
    );

    // Bygg & hantverk
    c.insert(
        "bygg",
        3,
        fact_and_items(
            "Byggbolag granskas hårt på projektredovisning: pågående arbeten och upparbetade men ej fakturerade intäkter.",
            vec![
                item(
                    "Omsättning och orderstock",
                    "Orderstocken är lika viktig som historiken.",
                    "Redovisa kontrakterad orderstock för kommande tolv månader tillsammans med omsättningen.",
                )
                .with_visual(bars(&[("År 1", 100.0), ("År 2", 96.0), ("År 3", 118.0)])),
            ],
        ),
    );
    c.insert(
        "bygg",
        4,
        fact("Många byggbolag har en eller två stora beställare. Visa att relationen bygger på flera kontaktpersoner och upphandlingar."),
    );
    c.insert(
        "bygg",
        7,
        items_only(vec![
            item(
                "Garantiåtaganden",
                "Pågående garantitider på utförda entreprenader.",
                "Sammanställ garantitider enligt AB 04 och ABT 06 och eventuella reklamationer. Köparen vill veta vad som kan komma tillbaka.",
            ),
            item(
                "Behörigheter och certifikat",
                "Behörigheter knutna till personer.",
                "Våtrumscertifikat, elbehörighet och liknande följer personen. Säkerställ att de finns kvar i bolaget efter affären.",
            ),
        ]),
    );

    // Handel & e-handel
    c.insert(
        "handel",
        2,
        fact("Inom handel värderas varumärke, kunddatabas och marginal per kanal. E-handel värderas ofta på omsättningstillväxt."),
    );
    c.insert(
        "handel",
        6,
        fact_and_items(
            "Lagret är ofta den största posten i balansräkningen. Inkurans är den vanligaste orsaken till prisavdrag i handelsbolag.",
            vec![
                item(
                    "Lagervärdering",
                    "Är lagret värderat till verkligt värde?",
                    "Gör en inventering och en inkuransbedömning. Varor som inte sålts på tolv månader bör skrivas ned.",
                )
                .with_visual(ring(30, "Typisk andel av balansomslutningen")),
            ],
        ),
    );
    c.insert(
        "handel",
        8,
        fact("Handelsbolag värderas ofta lägre än tjänstebolag i förhållande till resultat, men lagret tillkommer i köpeskillingen."),
    );

    // Restaurang & café
    c.insert(
        "restaurang",
        2,
        items_only(vec![
            item(
                "Koncept och läge",
                "Vad är konceptet och hur viktigt är läget?",
                "Restauranger säljs ofta på läge och hyresavtal. Beskriv gästunderlag, öppettider och säsongsvariationer.",
            )
            .with_visual(stats(&[
                ("30–35 %", "typisk råvarukostnad"),
                ("30–40 %", "typisk personalkostnad"),
            ])),
        ]),
    );
    c.insert(
        "restaurang",
        5,
        fact("Köksmästaren och ägaren är ofta samma person. Visa att menyer, recept och leverantörsval är dokumenterade."),
    );
    c.insert(
        "restaurang",
        7,
        fact_and_items(
            "Serveringstillstånd är personligt och följer inte med vid försäljning. Köparen måste söka nytt tillstånd.",
            vec![
                item(
                    "Hyresavtal",
                    "Löptid och rätt att överlåta.",
                    "Ett långt hyresavtal med besittningsskydd är ofta den mest värdefulla tillgången i en restaurang.",
                ),
                item(
                    "Serveringstillstånd",
                    "Tillstånd söks av köparen.",
                    "Planera för handläggningstid hos kommunen och låt tillträdet följa beslutet.",
                ),
            ],
        ),
    );

    // Tillverkning
    c.insert(
        "tillverkning",
        3,
        fact("Tillverkande bolag värderas på marginal och investeringsbehov. Visa maskinparkens ålder och kommande reinvesteringar."),
    );
    c.insert(
        "tillverkning",
        6,
        items_only(vec![
            item(
                "Maskiner och inventarier",
                "Bokfört värde mot marknadsvärde.",
                "Låt gärna en värderingsman bedöma maskinparken. Fullt avskrivna maskiner i drift kan vara värda mycket.",
            ),
        ]),
    );

    // Transport & logistik
    c.insert(
        "transport",
        4,
        fact("Transportbolag har ofta ett fåtal stora uppdragsgivare. Avtalens löptid och uppsägningstid avgör värdet."),
    );
    c.insert(
        "transport",
        7,
        items_only(vec![
            item(
                "Trafiktillstånd",
                "Tillstånd och trafikansvarig.",
                "Trafiktillståndet kräver en trafikansvarig med yrkeskunnande. Säkerställ att funktionen finns kvar efter affären.",
            )
            .with_visual(timeline(&[
                ("Före signering", "Kontrollera tillståndets villkor"),
                ("Vid tillträde", "Anmäl ny trafikansvarig vid behov"),
            ])),
        ]),
    );

    // Vård & omsorg
    c.insert(
        "vard",
        5,
        fact("Legitimerad personal och verksamhetschef är ofta avgörande. Köpare granskar bemanning och personalomsättning noga."),
    );
    c.insert(
        "vard",
        7,
        fact_and_items(
            "Tillstånd från IVO och avtal med regioner eller kommuner kan påverkas av ägarbyte. Kontrollera villkoren tidigt.",
            vec![item(
                "Tillstånd och avtal",
                "IVO-tillstånd och upphandlade avtal.",
                "Ägarbyte kan kräva ny ägar- och ledningsprövning. Upphandlade avtal kan innehålla villkor om ägarförändring.",
            )],
        ),
    );

    c
}
