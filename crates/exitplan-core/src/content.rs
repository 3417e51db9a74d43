//! Step and item content shown by the wizard.
//!
//! The base list is built once and never mutated; industry overlays in
//! [`crate::industry`] derive new lists from it.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub id: u8,
    pub title: String,
    pub subtitle: String,
    /// Time estimate shown next to the title, e.g. "10 min".
    pub duration: String,
    /// Highlighted fact box.
    pub fact: String,
    pub items: Vec<ItemDefinition>,
}

/// One expandable card within a step. Purely presentational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    pub title: String,
    pub summary: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<Visual>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Visual {
    BarChart { bars: Vec<BarDatum> },
    Ring { value: u8, label: String },
    Timeline { entries: Vec<TimelineEntry> },
    Stats { tiles: Vec<StatTile> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub period: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatTile {
    pub value: String,
    pub label: String,
}

// ── Builders ──

pub(crate) fn item(title: &str, summary: &str, details: &str) -> ItemDefinition {
    ItemDefinition {
        title: title.to_string(),
        summary: summary.to_string(),
        details: details.to_string(),
        visual: None,
    }
}

impl ItemDefinition {
    pub(crate) fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = Some(visual);
        self
    }
}

pub(crate) fn bars(data: &[(&str, f64)]) -> Visual {
    Visual::BarChart {
        bars: data
            .iter()
            .map(|(label, value)| BarDatum {
                label: label.to_string(),
                value: *value,
            })
            .collect(),
    }
}

pub(crate) fn ring(value: u8, label: &str) -> Visual {
    Visual::Ring {
        value: value.min(100),
        label: label.to_string(),
    }
}

pub(crate) fn timeline(entries: &[(&str, &str)]) -> Visual {
    Visual::Timeline {
        entries: entries
            .iter()
            .map(|(period, text)| TimelineEntry {
                period: period.to_string(),
                text: text.to_string(),
            })
            .collect(),
    }
}

pub(crate) fn stats(tiles: &[(&str, &str)]) -> Visual {
    Visual::Stats {
        tiles: tiles
            .iter()
            .map(|(value, label)| StatTile {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect(),
    }
}

fn step(
    id: u8,
    title: &str,
    subtitle: &str,
    duration: &str,
    fact: &str,
    items: Vec<ItemDefinition>,
) -> StepDefinition {
    StepDefinition {
        id,
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        duration: duration.to_string(),
        fact: fact.to_string(),
        items,
    }
}

// ── Base content ──

static BASE_STEPS: LazyLock<Vec<StepDefinition>> = LazyLock::new(build_base_steps);

/// The canonical step list, ids 1..=10 in order.
pub fn base_steps() -> &'static [StepDefinition] {
    &BASE_STEPS
}

/// Look up one step by id.
pub fn find_step(steps: &[StepDefinition], id: u8) -> Option<&StepDefinition> {
    steps.iter().find(|s| s.id == id)
}

fn build_base_steps() -> Vec<StepDefinition> {
    vec![
        step(
            1,
            "Strategi & motiv",
            "Varför vill du sälja, och vad är viktigast för dig i affären?",
            "10 min",
            "Säljare som har ett tydligt motiv och en plan får i regel bättre betalt och kortare förhandlingar.",
            vec![
                item(
                    "Ditt motiv",
                    "Köpare frågar alltid varför du säljer.",
                    "Ett ärligt och genomtänkt svar minskar misstänksamhet. Pension, nya projekt eller behov av kapital för tillväxt är vanliga och accepterade motiv.",
                ),
                item(
                    "Mål med försäljningen",
                    "Pris, tidpunkt, personalens framtid eller varumärkets fortlevnad.",
                    "Rangordna dina mål. Det styr vilken typ av köpare du ska leta efter och vilka villkor du kan kompromissa om.",
                ),
                item(
                    "Din roll efter affären",
                    "De flesta köpare vill att säljaren stannar en övergångsperiod.",
                    "Räkna med 6–24 månader. Tilläggsköpeskilling (earn-out) är vanligt när verksamheten är beroende av ägaren.",
                )
                .with_visual(timeline(&[
                    ("0–6 mån", "Överlämning av kunder och leverantörer"),
                    ("6–12 mån", "Rådgivande roll"),
                    ("12–24 mån", "Eventuell earn-out-period"),
                ])),
            ],
        ),
        step(
            2,
            "Verksamheten",
            "Beskriv vad bolaget gör och hur det tjänar pengar.",
            "10 min",
            "En köpare betalar för framtida kassaflöden, inte för historiken. Beskriv vad som gör intäkterna uthålliga.",
            vec![
                item(
                    "Affärsidé",
                    "Vad säljer ni, till vem och varför väljer kunderna er?",
                    "Håll beskrivningen konkret. Lyft fram återkommande intäkter, långa kundrelationer och nischer där ni har få konkurrenter.",
                ),
                item(
                    "Organisation",
                    "Antal anställda och hur ansvar är fördelat.",
                    "En organisation där fler än ägaren kan fatta beslut är mer värd. Rita gärna ett enkelt organisationsschema.",
                ),
                item(
                    "Marknad",
                    "Hur ser efterfrågan ut de närmaste åren?",
                    "Köpare värderar växande marknader högre. Beskriv trender som gynnar er och risker som kan påverka.",
                )
                .with_visual(stats(&[
                    ("75 %", "av småföretagsaffärer görs med branschköpare"),
                    ("9–12 mån", "typisk tid från beslut till tillträde"),
                ])),
            ],
        ),
        step(
            3,
            "Finansiell historik",
            "Omsättning och resultat de senaste tre åren.",
            "15 min",
            "Tre års stabil eller växande lönsamhet är det enskilt viktigaste underlaget vid en värdering.",
            vec![
                item(
                    "Omsättning tre år",
                    "Visa utvecklingen år för år.",
                    "Förklara avvikelser. Ett enskilt svagt år med en tydlig orsak är sällan ett problem.",
                )
                .with_visual(bars(&[("År 1", 100.0), ("År 2", 112.0), ("År 3", 125.0)])),
                item(
                    "Normaliserat resultat",
                    "Justera för ägarens lön och engångsposter.",
                    "Köparen räknar på resultatet som verksamheten ger utan dig. Lägg till överuttag, privata kostnader och engångskostnader.",
                ),
                item(
                    "Reviderade räkenskaper",
                    "Reviderade bokslut ökar trovärdigheten.",
                    "Saknar bolaget revisor kan en översiktlig granskning inför försäljning vara värd kostnaden.",
                ),
            ],
        ),
        step(
            4,
            "Kunder & avtal",
            "Hur beroende är ni av enskilda kunder?",
            "10 min",
            "Om en kund står för mer än 20 % av omsättningen ser de flesta köpare det som en betydande risk.",
            vec![
                item(
                    "Kundkoncentration",
                    "Andel av omsättningen från de största kunderna.",
                    "Lista de fem största kunderna och deras andel. Ju jämnare fördelning, desto lägre risk.",
                )
                .with_visual(ring(20, "Riskgräns för enskild kund")),
                item(
                    "Skriftliga avtal",
                    "Avtal gör intäkterna överförbara.",
                    "Se över att avtalen kan överlåtas vid ägarbyte och att de inte innehåller change-of-control-klausuler som ger kunden rätt att säga upp.",
                ),
                item(
                    "Leverantörer",
                    "Finns det leverantörer som är svåra att ersätta?",
                    "Beskriv alternativ och hur länge avtalen löper.",
                ),
            ],
        ),
        step(
            5,
            "Nyckelpersoner",
            "Hur mycket hänger på dig som ägare?",
            "10 min",
            "Ägarberoende är den vanligaste orsaken till att köpare sänker priset eller kräver earn-out.",
            vec![
                item(
                    "Ägarens roller",
                    "Vilka uppgifter gör bara du?",
                    "Skriv ner allt från kundkontakter till offertarbete. Varje uppgift som kan delegeras före försäljningen ökar värdet.",
                ),
                item(
                    "Ersättare",
                    "Finns det någon som kan ta över?",
                    "En utsedd ersättare eller ett ledningsteam gör bolaget mindre sårbart.",
                ),
                item(
                    "Dokumenterade processer",
                    "Rutiner som finns på papper följer med bolaget.",
                    "Dokumentera offerter, inköp, fakturering och kvalitetsarbete.",
                )
                .with_visual(stats(&[
                    ("2–3 år", "rimlig tid för att minska ägarberoende"),
                    ("20–30 %", "möjlig värdeskillnad"),
                ])),
            ],
        ),
        step(
            6,
            "Balansräkning",
            "Städa balansräkningen inför försäljningen.",
            "10 min",
            "Tillgångar som inte behövs i verksamheten betalar köparen sällan fullt för. Lyft ut dem före affären.",
            vec![
                item(
                    "Rörelsefrämmande tillgångar",
                    "Fastigheter, värdepapper, överskottslikviditet.",
                    "Sådana tillgångar kan delas ut eller flyttas till ett annat bolag innan försäljningen.",
                ),
                item(
                    "Lager och kundfordringar",
                    "Inkurant lager och gamla fordringar sänker värdet.",
                    "Gör en genomgång och skriv ned det som inte går att sälja eller driva in.",
                ),
                item(
                    "Aktieägarlån",
                    "Lån till eller från ägaren ska regleras.",
                    "Reglera lånen i god tid så att de inte komplicerar köpeskillingen.",
                ),
            ],
        ),
        step(
            7,
            "Juridik",
            "Avtal, tillstånd och eventuella tvister.",
            "10 min",
            "Juridiska brister som upptäcks i due diligence leder ofta till sänkt pris eller garantier som binder dig i flera år.",
            vec![
                item(
                    "Bolagsdokument",
                    "Bolagsordning, aktiebok och aktieägaravtal.",
                    "Kontrollera att aktieboken är uppdaterad och att aktieägaravtalet inte hindrar en försäljning.",
                ),
                item(
                    "Avtal och tillstånd",
                    "Hyresavtal, anställningsavtal och myndighetstillstånd.",
                    "Notera uppsägningstider och om tillstånd är personliga eller följer med bolaget.",
                ),
                item(
                    "Tvister",
                    "Pågående eller hotande tvister.",
                    "Redovisa öppet. Okända tvister som dyker upp sent är det som skadar förtroendet mest.",
                ),
            ],
        ),
        step(
            8,
            "Värdering & tidplan",
            "Vad förväntar du dig och när vill du vara klar?",
            "10 min",
            "Småföretag värderas ofta till 3–6 gånger normaliserat rörelseresultat, beroende på bransch och risk.",
            vec![
                item(
                    "Prisförväntan",
                    "Ditt lägsta acceptabla pris.",
                    "Ha en realistisk bild. En alltför hög förväntan förlänger processen och skrämmer bort seriösa köpare.",
                )
                .with_visual(bars(&[("Låg", 3.0), ("Mitt", 4.5), ("Hög", 6.0)])),
                item(
                    "Tidplan",
                    "En normal process tar 6–12 månader.",
                    "Planera för förberedelser, marknadsföring, förhandling och due diligence.",
                )
                .with_visual(timeline(&[
                    ("Månad 1–2", "Förberedelser och värdering"),
                    ("Månad 3–5", "Kontakt med köpare"),
                    ("Månad 6–8", "Förhandling och avsiktsförklaring"),
                    ("Månad 9–12", "Due diligence och tillträde"),
                ])),
                item(
                    "Tänkbara köpare",
                    "Konkurrenter, investerare, anställda eller familj.",
                    "Olika köpare betalar för olika saker. En konkurrent betalar för synergier, en investerare för stabilt kassaflöde.",
                ),
            ],
        ),
        step(
            9,
            "Sammanställning & beredskap",
            "Se hur redo bolaget är och få en analys.",
            "5 min",
            "När alla delar är ifyllda tar vi fram en riskbedömning, SWOT och ett värderingsintervall.",
            vec![
                item(
                    "Beredskap",
                    "Hur stor del av förberedelserna som är klara.",
                    "Alla steg 1–8 behöver vara ifyllda för att analysen ska bli rättvisande.",
                )
                .with_visual(ring(0, "Beredskap")),
                item(
                    "Analys",
                    "Risker, styrkor och ett värderingsintervall.",
                    "Analysen bygger på dina svar och eventuella uppladdade dokument.",
                ),
            ],
        ),
        step(
            10,
            "Nästa steg",
            "Välj hur du vill gå vidare.",
            "2 min",
            "Säljare som tar hjälp av en rådgivare når oftare ett avslut.",
            vec![
                item(
                    "Rapport",
                    "Ladda ner analysen som PDF.",
                    "Rapporten kan delas med revisor, bank eller rådgivare.",
                ),
                item(
                    "Rådgivning",
                    "Boka ett samtal med en M&A-rådgivare.",
                    "En rådgivare hjälper till med värdering, köparsökning och förhandling.",
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{FIRST_STEP, LAST_STEP};

    #[test]
    fn base_ids_are_contiguous() {
        let ids: Vec<u8> = base_steps().iter().map(|s| s.id).collect();
        let expected: Vec<u8> = (FIRST_STEP..=LAST_STEP).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn every_step_has_content() {
        for step in base_steps() {
            assert!(!step.title.is_empty(), "step {} title", step.id);
            assert!(!step.fact.is_empty(), "step {} fact", step.id);
            assert!(!step.items.is_empty(), "step {} items", step.id);
        }
    }

    #[test]
    fn find_step_by_id() {
        assert_eq!(find_step(base_steps(), 4).unwrap().title, "Kunder & avtal");
        assert!(find_step(base_steps(), 11).is_none());
    }

    #[test]
    fn visual_is_tagged_by_kind() {
        let json = serde_json::to_value(ring(140, "x")).unwrap();
        assert_eq!(json["kind"], "ring");
        assert_eq!(json["value"], 100);
    }
}
