//! The fixed interview rubric: five categories of weighted checklist items.
//!
//! Items are identified by `<category-key>:<ordinal>` rather than by their
//! label text, so rewording a label does not break restoring saved forms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::CheckedItem;

/// Stable key of a rubric category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryKey {
    CodeQuality,
    Architecture,
    ProblemSolving,
    Technical,
    Communication,
}

impl CategoryKey {
    /// All keys in rubric order.
    pub const ALL: [CategoryKey; 5] = [
        CategoryKey::CodeQuality,
        CategoryKey::Architecture,
        CategoryKey::ProblemSolving,
        CategoryKey::Technical,
        CategoryKey::Communication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::CodeQuality => "code-quality",
            CategoryKey::Architecture => "architecture",
            CategoryKey::ProblemSolving => "problem-solving",
            CategoryKey::Technical => "technical",
            CategoryKey::Communication => "communication",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// A single gradable statement with a point weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItem {
    /// 1-based position within its category.
    pub ordinal: u8,
    /// Points awarded when checked.
    pub weight: u32,
    /// Display label.
    pub label: &'static str,
}

/// A rubric grouping of checklist items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub key: CategoryKey,
    /// Display name.
    pub name: &'static str,
    /// Maximum attainable score.
    pub max_score: u32,
    /// Category multiplier. Always 1; kept for future weighting and never applied.
    pub weight: u32,
    pub items: &'static [ChecklistItem],
}

impl Category {
    pub fn item(&self, ordinal: u8) -> Option<&ChecklistItem> {
        self.items.iter().find(|i| i.ordinal == ordinal)
    }

    pub fn item_id(&self, item: &ChecklistItem) -> ItemId {
        ItemId {
            category: self.key,
            ordinal: item.ordinal,
        }
    }
}

/// Stable synthetic identifier of a checklist item, rendered as `code-quality:1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    pub category: CategoryKey,
    pub ordinal: u8,
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.ordinal)
    }
}

impl FromStr for ItemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, ordinal) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("invalid item id '{s}', expected <category>:<number>"))?;
        let category: CategoryKey = category.parse()?;
        let ordinal: u8 = ordinal
            .parse()
            .map_err(|_| format!("invalid item number in '{s}'"))?;
        Ok(ItemId { category, ordinal })
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The full rubric.
#[derive(Debug, Clone, Copy)]
pub struct Rubric {
    categories: &'static [Category; 5],
}

impl Rubric {
    /// The reference interview rubric (global maximum 65).
    pub fn reference() -> &'static Rubric {
        &REFERENCE
    }

    pub fn categories(&self) -> &'static [Category] {
        self.categories
    }

    /// The table is laid out in `CategoryKey` order, so the key is the index.
    pub fn category(&self, key: CategoryKey) -> &'static Category {
        &self.categories[key as usize]
    }

    /// Look up a category by its string key; unknown keys yield `None`.
    pub fn find(&self, key: &str) -> Option<&'static Category> {
        let key: CategoryKey = key.parse().ok()?;
        Some(self.category(key))
    }

    pub fn item(&self, id: ItemId) -> Option<&'static ChecklistItem> {
        self.category(id.category).item(id.ordinal)
    }

    /// Sum of all category maxima.
    pub fn max_total(&self) -> u32 {
        self.categories.iter().map(|c| c.max_score).sum()
    }

    /// Iterate over every item with its identifier.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &'static ChecklistItem)> + '_ {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter().map(move |i| (c.item_id(i), i)))
    }

    /// Build the persisted triple for an item.
    pub fn checked_item(&self, id: ItemId) -> Option<CheckedItem> {
        self.item(id).map(|item| CheckedItem {
            id: Some(id),
            category: id.category.as_str().to_string(),
            weight: item.weight,
            text: item.label.to_string(),
        })
    }

    /// Map a persisted checked item back to a rubric item.
    ///
    /// An explicit id wins; otherwise the item is matched on
    /// category, weight and label text, as older documents carry no id.
    pub fn resolve(&self, checked: &CheckedItem) -> Option<ItemId> {
        if let Some(id) = checked.id {
            return self.item(id).map(|_| id);
        }
        let category = self.find(&checked.category)?;
        let text = checked.text.trim();
        category
            .items
            .iter()
            .find(|i| i.weight == checked.weight && i.label == text)
            .map(|i| category.item_id(i))
    }

    /// Authoring-time check: item weights of each category sum to its maximum.
    pub fn well_formed_violations(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter_map(|c| {
                let sum: u32 = c.items.iter().map(|i| i.weight).sum();
                (sum != c.max_score).then(|| {
                    format!(
                        "category '{}' items sum to {sum}, maximum is {}",
                        c.key, c.max_score
                    )
                })
            })
            .collect()
    }
}

const fn item(ordinal: u8, weight: u32, label: &'static str) -> ChecklistItem {
    ChecklistItem {
        ordinal,
        weight,
        label,
    }
}

static CODE_QUALITY_ITEMS: [ChecklistItem; 6] = [
    item(1, 3, "Estrutura de código limpa e legível"),
    item(2, 2, "Convenções de nomenclatura adequadas"),
    item(3, 2, "Formatação de código consistente"),
    item(4, 3, "Implementação do princípio DRY"),
    item(5, 2, "Comentários e documentação significativos"),
    item(6, 4, "Implementação de tratamento de erros"),
];

static ARCHITECTURE_ITEMS: [ChecklistItem; 6] = [
    item(1, 4, "Componentização/modularização adequada"),
    item(2, 3, "Separação de responsabilidades"),
    item(3, 3, "Design de arquitetura escalável"),
    item(4, 3, "Uso de padrões de design"),
    item(5, 2, "Gerenciamento de fluxo de dados"),
    item(6, 2, "Abordagem de gerenciamento de estado"),
];

static PROBLEM_SOLVING_ITEMS: [ChecklistItem; 6] = [
    item(1, 4, "Implementação eficiente de algoritmos"),
    item(2, 3, "Consideração de complexidade temporal"),
    item(3, 2, "Otimização de complexidade espacial"),
    item(4, 3, "Tratamento de casos extremos"),
    item(5, 3, "Processo de pensamento lógico"),
    item(6, 2, "Demonstração de habilidades de depuração"),
];

static TECHNICAL_ITEMS: [ChecklistItem; 6] = [
    item(1, 3, "Boas práticas específicas da linguagem"),
    item(2, 3, "Conhecimento de frameworks/bibliotecas"),
    item(3, 2, "Proficiência em controle de versão"),
    item(4, 3, "Compreensão de abordagem de testes"),
    item(5, 2, "Considerações de segurança"),
    item(6, 2, "Consciência de otimização de performance"),
];

static COMMUNICATION_ITEMS: [ChecklistItem; 5] = [
    item(1, 2, "Explicação clara da abordagem"),
    item(2, 2, "Perguntas feitas para esclarecimento"),
    item(3, 2, "Capacidade de apresentar o código"),
    item(4, 2, "Receptivo ao feedback"),
    item(5, 2, "Resolução colaborativa de problemas"),
];

static CATEGORIES: [Category; 5] = [
    Category {
        key: CategoryKey::CodeQuality,
        name: "Qualidade do Código",
        max_score: 16,
        weight: 1,
        items: &CODE_QUALITY_ITEMS,
    },
    Category {
        key: CategoryKey::Architecture,
        name: "Arquitetura",
        max_score: 17,
        weight: 1,
        items: &ARCHITECTURE_ITEMS,
    },
    Category {
        key: CategoryKey::ProblemSolving,
        name: "Resolução de Problemas",
        max_score: 17,
        weight: 1,
        items: &PROBLEM_SOLVING_ITEMS,
    },
    Category {
        key: CategoryKey::Technical,
        name: "Conhecimento Técnico",
        max_score: 15,
        weight: 1,
        items: &TECHNICAL_ITEMS,
    },
    Category {
        key: CategoryKey::Communication,
        name: "Comunicação",
        max_score: 10,
        weight: 1,
        items: &COMMUNICATION_ITEMS,
    },
];

static REFERENCE: Rubric = Rubric {
    categories: &CATEGORIES,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_rubric_totals() {
        let rubric = Rubric::reference();
        assert_eq!(rubric.categories().len(), 5);
        assert_eq!(rubric.max_total(), 65);
        assert!(rubric.well_formed_violations().is_empty());
        assert!(rubric.categories().iter().all(|c| c.weight == 1));
    }

    #[test]
    fn category_lookup_returns_matching_key() {
        let rubric = Rubric::reference();
        for (i, key) in CategoryKey::ALL.into_iter().enumerate() {
            assert_eq!(rubric.categories()[i].key, key);
            assert_eq!(rubric.category(key).key, key);
        }
        assert_eq!(rubric.category(CategoryKey::Communication).max_score, 10);
    }

    #[test]
    fn category_keys_round_trip_through_strings() {
        for key in CategoryKey::ALL {
            assert_eq!(key.as_str().parse::<CategoryKey>().unwrap(), key);
        }
        assert!("design".parse::<CategoryKey>().is_err());
        assert_eq!(
            serde_json::to_string(&CategoryKey::ProblemSolving).unwrap(),
            "\"problem-solving\""
        );
    }

    #[test]
    fn item_id_parse_and_display() {
        let id: ItemId = "code-quality:2".parse().unwrap();
        assert_eq!(id.category, CategoryKey::CodeQuality);
        assert_eq!(id.ordinal, 2);
        assert_eq!(id.to_string(), "code-quality:2");
        assert!("code-quality".parse::<ItemId>().is_err());
        assert!("code-quality:x".parse::<ItemId>().is_err());
        assert!("nope:1".parse::<ItemId>().is_err());
    }

    #[test]
    fn item_ids_are_unique() {
        let ids: std::collections::HashSet<_> =
            Rubric::reference().items().map(|(id, _)| id).collect();
        assert_eq!(ids.len(), Rubric::reference().items().count());
    }

    #[test]
    fn resolve_prefers_explicit_id() {
        let rubric = Rubric::reference();
        let checked = CheckedItem {
            id: Some("architecture:1".parse().unwrap()),
            category: "architecture".into(),
            weight: 99,
            text: "reworded label".into(),
        };
        assert_eq!(
            rubric.resolve(&checked),
            Some("architecture:1".parse().unwrap())
        );
    }

    #[test]
    fn resolve_falls_back_to_label_match() {
        let rubric = Rubric::reference();
        let checked = CheckedItem {
            id: None,
            category: "code-quality".into(),
            weight: 2,
            text: "Convenções de nomenclatura adequadas".into(),
        };
        assert_eq!(
            rubric.resolve(&checked),
            Some("code-quality:2".parse().unwrap())
        );

        let unknown = CheckedItem {
            text: "Something else".into(),
            ..checked
        };
        assert_eq!(rubric.resolve(&unknown), None);
    }

    #[test]
    fn checked_item_carries_wire_triple() {
        let item = Rubric::reference()
            .checked_item("communication:3".parse().unwrap())
            .unwrap();
        assert_eq!(item.category, "communication");
        assert_eq!(item.weight, 2);
        assert_eq!(item.text, "Capacidade de apresentar o código");
    }
}
