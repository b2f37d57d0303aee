//! Plan texts and upstream URLs shared by the integration tests.

pub const TODAY_URL: &str = "https://plans.test/v_schueler_heute.pdf";
pub const TOMORROW_URL: &str = "https://plans.test/v_schueler_morgen.pdf";

/// Text layer of a "today" plan as the PDF extractor returns it
pub const TODAY_PLAN: &str = "\
Lessing-Gymnasium Karlsruhe
Vertretungsplan für Montag, 19.10.2026

Stunde Klasse Fach Lehrer Raum Bemerkung
3  6abcd  Kob  102  Cop
Entfall 5 6c Nph Pie NWT3 fällt aus
Raum-Vtr. 3 7b Ph Bru 310
2 J12 M Sch 104

Seite 1 / 1
";

/// Text layer of a "tomorrow" plan
pub const TOMORROW_PLAN: &str = "\
Vertretungsplan für Dienstag, 20.10.2026
Verlegung 3 9c F Brn 203
1 6abcd D Mey 101
";

/// A plan whose text has no recognizable rows
pub const EMPTY_PLAN: &str = "Keine Vertretungen\n";
