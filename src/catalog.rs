//! The plant catalog.
//!
//! A fixed, ordered table of monographs compiled into the binary. Records are
//! never mutated or removed at runtime; the order of [`PLANTS`] is the display
//! order everywhere (gallery, static pages, `list` output).
//!
//! ## Evidence Levels
//!
//! `evidence_level` is an open label rather than an enum. The set used by the
//! table is `"Muito Baixo"`, `"Baixo"`, `"Moderado"`, `"Alto"` and `"Risco"`,
//! but any string is accepted. The renderer picks a display treatment through
//! [`PlantRecord::evidence_tone`]:
//!
//! | Label | Tone |
//! |-------|------|
//! | exactly `"Alto"` | [`EvidenceTone::Strong`] |
//! | contains `"Risco"` | [`EvidenceTone::Risk`] |
//! | anything else | [`EvidenceTone::Caution`] |

use serde::Serialize;

/// One plant monograph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlantRecord {
    /// Unique slug, used for image lookup and detail navigation.
    pub id: &'static str,
    pub common_name: &'static str,
    pub scientific_name: &'static str,
    /// Free-text label. Filtering matches by substring, not equality.
    pub category: &'static str,
    pub description: &'static str,
    pub mechanism: &'static str,
    pub dosage: &'static str,
    pub interactions: &'static str,
    pub adverse_effects: &'static str,
    pub contraindications: &'static str,
    pub evidence_level: &'static str,
}

/// Display treatment for an evidence label, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EvidenceTone {
    Strong,
    Caution,
    Risk,
}

impl EvidenceTone {
    /// CSS modifier used by the renderer.
    pub fn css_class(self) -> &'static str {
        match self {
            EvidenceTone::Strong => "tone-strong",
            EvidenceTone::Caution => "tone-caution",
            EvidenceTone::Risk => "tone-risk",
        }
    }
}

impl PlantRecord {
    pub fn evidence_tone(&self) -> EvidenceTone {
        if self.evidence_level == "Alto" {
            EvidenceTone::Strong
        } else if self.evidence_level.contains("Risco") {
            EvidenceTone::Risk
        } else {
            EvidenceTone::Caution
        }
    }

    /// Banner text shown next to the evidence badge on the detail view.
    pub fn evidence_banner(&self) -> String {
        match self.evidence_tone() {
            EvidenceTone::Strong => "Nível Alto: Estudos Clínicos Robustos".to_string(),
            EvidenceTone::Risk => "⚠️ Atenção: Risco Elevado".to_string(),
            EvidenceTone::Caution => format!("Nível: {}", self.evidence_level),
        }
    }
}

/// Immutable, ordered view over the plant table.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    records: &'static [PlantRecord],
}

impl Catalog {
    /// The built-in herbarium.
    pub fn builtin() -> Self {
        Self::from_static(PLANTS)
    }

    /// Wrap an arbitrary static table. Ids must be unique.
    pub fn from_static(records: &'static [PlantRecord]) -> Self {
        debug_assert!(
            ids_are_unique(records),
            "catalog table contains duplicate ids"
        );
        Self { records }
    }

    pub fn records(&self) -> &'static [PlantRecord] {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&'static PlantRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Distinct category labels in first-seen order.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        for record in self.records {
            if !seen.contains(&record.category) {
                seen.push(record.category);
            }
        }
        seen
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn ids_are_unique(records: &[PlantRecord]) -> bool {
    let mut ids: Vec<&str> = records.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids.windows(2).all(|w| w[0] != w[1])
}

#[allow(clippy::too_many_arguments)]
const fn plant(
    id: &'static str,
    common_name: &'static str,
    scientific_name: &'static str,
    category: &'static str,
    description: &'static str,
    mechanism: &'static str,
    dosage: &'static str,
    interactions: &'static str,
    adverse_effects: &'static str,
    contraindications: &'static str,
    evidence_level: &'static str,
) -> PlantRecord {
    PlantRecord {
        id,
        common_name,
        scientific_name,
        category,
        description,
        mechanism,
        dosage,
        interactions,
        adverse_effects,
        contraindications,
        evidence_level,
    }
}

pub static PLANTS: &[PlantRecord] = &[
    plant(
        "tribulus",
        "Tribulus",
        "Tribulus terrestris L.",
        "Hormonal",
        "Espécie rica em saponinas esteroidais.",
        "Aumento de LH, testosterona e DHEA. Estímulo de NO.",
        "250 mg, 3x ao dia (45% saponinas).",
        "Potencializa hormonais e TRH.",
        "Refluxo, náusea.",
        "Grávidas, HPB sem controle.",
        "Moderado",
    ),
    plant(
        "maca",
        "Maca Peruana",
        "Lepidium meyenii Walp.",
        "Adaptógeno",
        "Raiz andina nutritiva e tônica.",
        "Modulação seminal e antioxidante. Inibição da FAAH.",
        "1,5 a 3 g/dia.",
        "Interfere em exames hormonais.",
        "Desconforto digestivo.",
        "Câncer hormônio-dependente.",
        "Alto",
    ),
    plant(
        "ashwagandha",
        "Ashwagandha",
        "Withania somnifera",
        "Adaptógeno / Força",
        "Ginseng Indiano. Redução de cortisol.",
        "GABA-mimético, reduz cortisol, aumenta ATP.",
        "300-600 mg/dia.",
        "Potencializa sedativos.",
        "Sonolência, risco tireoidiano.",
        "Gravidez, doenças autoimunes.",
        "Alto",
    ),
    plant(
        "mucuna",
        "Mucuna",
        "Mucuna pruriens",
        "Neuromodulador",
        "Fonte natural de L-DOPA.",
        "Aumenta dopamina, reduzindo prolactina.",
        "400 mg (20% L-DOPA).",
        "Contraindicado com IMAOs.",
        "Náusea, discinesia.",
        "Esquizofrenia, gravidez.",
        "Moderado",
    ),
    plant(
        "longjack",
        "Long Jack",
        "Eurycoma longifolia",
        "Hormonal",
        "Tongkat Ali. Libera testosterona ligada.",
        "Reduz SHBG e conversão em estrogênio.",
        "400 mg/dia (euricomanona).",
        "Reduz absorção de propranolol.",
        "Raro risco hepático.",
        "Câncer de próstata.",
        "Moderado",
    ),
    plant(
        "serenoa",
        "Saw Palmetto",
        "Serenoa repens",
        "Próstata",
        "Palmeira anã. Padrão ouro para próstata.",
        "Inibe 5-alfa-redutase (Testo -> DHT).",
        "320 mg/dia.",
        "Risco sangramento.",
        "Náusea, cefaleia.",
        "Mulheres em idade fértil.",
        "Alto",
    ),
    plant(
        "ajuga",
        "Turkesterone",
        "Ajuga turkestanica",
        "Anabólico Natural",
        "Rica em ecdisteroides.",
        "Síntese proteica via receptor ERβ.",
        "500-2000 mg/dia.",
        "Sinergia com anabolizantes.",
        "Segurança alta em estudos curtos.",
        "Hipersensibilidade.",
        "Baixo",
    ),
    plant(
        "prunus",
        "Pygeum",
        "Prunus africana",
        "Próstata",
        "Cerejeira africana. Anti-inflamatório.",
        "Inibe proliferação de fibroblastos.",
        "100-200 mg/dia.",
        "Seguro.",
        "Desconforto gástrico raro.",
        "Crianças.",
        "Alto",
    ),
    plant(
        "urtica",
        "Urtiga",
        "Urtica dioica",
        "Próstata / SHBG",
        "Raiz de urtiga. 'Destrava' a testosterona.",
        "Liga-se à SHBG.",
        "300-600 mg/dia.",
        "Potencializa diuréticos.",
        "Leve desconforto GI.",
        "Insuficiência renal/cardíaca.",
        "Moderado",
    ),
    plant(
        "feno",
        "Feno-Grego",
        "Trigonella foenum-graecum",
        "Metabólico",
        "Sementes para libido e glicemia.",
        "Inibição parcial aromatase. Sensibiliza LH.",
        "500-600 mg/dia.",
        "Potencializa insulina.",
        "Odor corporal característico.",
        "Gravidez.",
        "Alto",
    ),
    plant(
        "tetradium",
        "Evodia",
        "Tetradium ruticarpum",
        "Metabólico",
        "Wu Zhu Yu. Termogênico.",
        "Agonista vanilóide.",
        "5-30 mg/dia (evodiamina).",
        "Inibe enzimas hepáticas CYP.",
        "Falta de dados.",
        "Não recomendado.",
        "Baixo",
    ),
    plant(
        "cyanotis",
        "Cyanotis",
        "Cyanotis vaga",
        "Anabólico Natural",
        "Fonte de Beta-Ecdisterona.",
        "Similar ao Turkesterone.",
        "Dose não estabelecida.",
        "Desconhecidas.",
        "Falta de estudos.",
        "Não recomendado.",
        "Muito Baixo",
    ),
    plant(
        "kaempferia",
        "Gengibre Preto",
        "Kaempferia parviflora",
        "Vigor",
        "Ginseng Tailandês. Vasodilatador.",
        "Inibe PDE5, aumenta NO.",
        "180-360 mg/dia.",
        "Cuidado com hipotensores.",
        "Bem tolerado.",
        "Crianças.",
        "Baixo",
    ),
    plant(
        "bulbine",
        "Bulbine",
        "Bulbine latifolia",
        "Hormonal (Exp)",
        "Planta africana potente mas arriscada.",
        "Aumento agudo de testosterona.",
        "Não segura.",
        "Altera enzimas renais.",
        "Hepatotóxico.",
        "Contraindicado.",
        "Risco",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_fourteen_records_in_table_order() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 14);
        assert_eq!(catalog.records()[0].id, "tribulus");
        assert_eq!(catalog.records()[13].id, "bulbine");
    }

    #[test]
    fn builtin_ids_are_unique() {
        assert!(ids_are_unique(PLANTS));
    }

    #[test]
    fn every_field_is_populated() {
        for r in PLANTS {
            for field in [
                r.id,
                r.common_name,
                r.scientific_name,
                r.category,
                r.description,
                r.mechanism,
                r.dosage,
                r.interactions,
                r.adverse_effects,
                r.contraindications,
                r.evidence_level,
            ] {
                assert!(!field.is_empty(), "empty field in record {}", r.id);
            }
        }
    }

    #[test]
    fn find_by_id() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.find("maca").unwrap().common_name, "Maca Peruana");
        assert!(catalog.find("unknown").is_none());
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        let cats = Catalog::builtin().categories();
        assert_eq!(cats[0], "Hormonal");
        assert_eq!(cats[1], "Adaptógeno");
        assert_eq!(cats.iter().filter(|c| **c == "Hormonal").count(), 1);
        assert!(cats.contains(&"Hormonal (Exp)"));
    }

    #[test]
    fn bulbine_is_highest_severity() {
        let bulbine = Catalog::builtin().find("bulbine").unwrap();
        assert_eq!(bulbine.evidence_level, "Risco");
        assert_eq!(bulbine.evidence_tone(), EvidenceTone::Risk);
        let max = PLANTS.iter().map(|r| r.evidence_tone()).max().unwrap();
        assert_eq!(max, EvidenceTone::Risk);
    }

    #[test]
    fn evidence_tone_mapping() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.find("maca").unwrap().evidence_tone(),
            EvidenceTone::Strong
        );
        assert_eq!(
            catalog.find("cyanotis").unwrap().evidence_tone(),
            EvidenceTone::Caution
        );
        assert_eq!(
            catalog.find("tribulus").unwrap().evidence_banner(),
            "Nível: Moderado"
        );
    }

    #[test]
    fn unknown_evidence_label_is_caution() {
        let mut record = *Catalog::builtin().find("maca").unwrap();
        record.evidence_level = "Inconclusivo";
        assert_eq!(record.evidence_tone(), EvidenceTone::Caution);
        record.evidence_level = "Risco Alto";
        assert_eq!(record.evidence_tone(), EvidenceTone::Risk);
    }
}
