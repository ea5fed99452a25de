use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The four resource catalogs searched for every use case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Backend {
    #[serde(rename = "arxiv")]
    Arxiv,
    #[serde(rename = "huggingface")]
    HuggingFace,
    #[serde(rename = "kaggle")]
    Kaggle,
    #[serde(rename = "github")]
    GitHub,
}

impl Backend {
    pub const ALL: [Backend; 4] = [
        Backend::Arxiv,
        Backend::HuggingFace,
        Backend::Kaggle,
        Backend::GitHub,
    ];

    /// Key of the backend in the canonical `resources` object
    pub fn key(self) -> &'static str {
        match self {
            Backend::Arxiv => "arxiv",
            Backend::HuggingFace => "huggingface",
            Backend::Kaggle => "kaggle",
            Backend::GitHub => "github",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Backend::Arxiv => "arXiv",
            Backend::HuggingFace => "Hugging Face",
            Backend::Kaggle => "Kaggle",
            Backend::GitHub => "GitHub",
        }
    }

    /// Generic search page of the catalog for `term`
    pub fn search_page_url(self, term: &str) -> String {
        let query = plus_joined(term);
        match self {
            Backend::Arxiv => format!("https://arxiv.org/search/?query={}", query),
            Backend::HuggingFace => format!("https://huggingface.co/search?q={}", query),
            Backend::Kaggle => format!("https://www.kaggle.com/search?q={}", query),
            Backend::GitHub => format!(
                "https://github.com/search?q={}&type=repositories",
                query
            ),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Spaces become `+`, everything else reserved is percent-encoded
pub fn plus_joined(term: &str) -> String {
    term.split(' ')
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// A search hit, tagged with whether it came from a real catalog result or
/// was synthesized to point at a generic search page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceItem<T> {
    Real(T),
    Placeholder(T),
}

impl<T> ResourceItem<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ResourceItem::Placeholder(_))
    }

    pub fn inner(&self) -> &T {
        match self {
            ResourceItem::Real(item) | ResourceItem::Placeholder(item) => item,
        }
    }

    /// Transforms the payload, keeping the tag
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResourceItem<U> {
        match self {
            ResourceItem::Real(item) => ResourceItem::Real(f(item)),
            ResourceItem::Placeholder(item) => ResourceItem::Placeholder(f(item)),
        }
    }
}

/// Projection of an item onto its canonical minimal shape
pub trait Canonical {
    fn canonical(self) -> Self;
}

/// Academic paper (arXiv)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Canonical for Paper {
    fn canonical(self) -> Self {
        Self {
            summary: None,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubKind {
    Model,
    Dataset,
}

/// Model or dataset on the Hugging Face Hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubEntry {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<HubKind>,
}

impl Canonical for HubEntry {
    fn canonical(self) -> Self {
        Self {
            downloads: None,
            kind: None,
            ..self
        }
    }
}

/// Dataset or notebook on Kaggle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KaggleEntry {
    pub title: String,
    pub url: String,
}

impl Canonical for KaggleEntry {
    fn canonical(self) -> Self {
        self
    }
}

/// Code repository (GitHub)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub stars: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Canonical for Repository {
    fn canonical(self) -> Self {
        Self {
            description: None,
            ..self
        }
    }
}

/// Results of one backend search, tagged with the backend that produced them
#[derive(Debug, Clone, PartialEq)]
pub enum BackendHits {
    Arxiv(Vec<ResourceItem<Paper>>),
    HuggingFace(Vec<ResourceItem<HubEntry>>),
    Kaggle(Vec<ResourceItem<KaggleEntry>>),
    GitHub(Vec<ResourceItem<Repository>>),
}

impl BackendHits {
    pub fn empty(backend: Backend) -> Self {
        match backend {
            Backend::Arxiv => BackendHits::Arxiv(Vec::new()),
            Backend::HuggingFace => BackendHits::HuggingFace(Vec::new()),
            Backend::Kaggle => BackendHits::Kaggle(Vec::new()),
            Backend::GitHub => BackendHits::GitHub(Vec::new()),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            BackendHits::Arxiv(_) => Backend::Arxiv,
            BackendHits::HuggingFace(_) => Backend::HuggingFace,
            BackendHits::Kaggle(_) => Backend::Kaggle,
            BackendHits::GitHub(_) => Backend::GitHub,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BackendHits::Arxiv(items) => items.len(),
            BackendHits::HuggingFace(items) => items.len(),
            BackendHits::Kaggle(items) => items.len(),
            BackendHits::GitHub(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per use case resources, one slot per backend.
///
/// The four keys are fields, so the canonical object always has exactly the
/// four backend keys; each slot is written by exactly one backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResourceMap {
    pub arxiv: Vec<ResourceItem<Paper>>,
    pub huggingface: Vec<ResourceItem<HubEntry>>,
    pub kaggle: Vec<ResourceItem<KaggleEntry>>,
    pub github: Vec<ResourceItem<Repository>>,
}

impl ResourceMap {
    /// Stores the hits in their backend's slot, replacing previous content
    pub fn insert(&mut self, hits: BackendHits) {
        match hits {
            BackendHits::Arxiv(items) => self.arxiv = items,
            BackendHits::HuggingFace(items) => self.huggingface = items,
            BackendHits::Kaggle(items) => self.kaggle = items,
            BackendHits::GitHub(items) => self.github = items,
        }
    }

    pub fn len_of(&self, backend: Backend) -> usize {
        match backend {
            Backend::Arxiv => self.arxiv.len(),
            Backend::HuggingFace => self.huggingface.len(),
            Backend::Kaggle => self.kaggle.len(),
            Backend::GitHub => self.github.len(),
        }
    }

    pub fn total(&self) -> usize {
        Backend::ALL.iter().map(|b| self.len_of(*b)).sum()
    }

    /// Backends whose slot is empty, in canonical order
    pub fn missing_backends(&self) -> Vec<Backend> {
        Backend::ALL
            .into_iter()
            .filter(|b| self.len_of(*b) == 0)
            .collect()
    }

    /// Puts a single placeholder pointing at the backend's search page for
    /// `term` into the backend's slot.
    pub fn insert_placeholder(&mut self, backend: Backend, term: &str) {
        let url = backend.search_page_url(term);
        let label = format!("Search {} for: {}", backend.display_name(), term);
        let hits = match backend {
            Backend::Arxiv => BackendHits::Arxiv(vec![ResourceItem::Placeholder(Paper {
                title: label,
                url,
                summary: None,
            })]),
            Backend::HuggingFace => {
                BackendHits::HuggingFace(vec![ResourceItem::Placeholder(HubEntry {
                    name: label,
                    url,
                    downloads: None,
                    kind: None,
                })])
            }
            Backend::Kaggle => BackendHits::Kaggle(vec![ResourceItem::Placeholder(KaggleEntry {
                title: label,
                url,
            })]),
            Backend::GitHub => {
                BackendHits::GitHub(vec![ResourceItem::Placeholder(Repository {
                    name: label,
                    url,
                    stars: 0,
                    description: None,
                })])
            }
        };
        self.insert(hits);
    }

    /// Drops transient fields from every item
    pub fn canonical(self) -> Self {
        Self {
            arxiv: canonical_items(self.arxiv),
            huggingface: canonical_items(self.huggingface),
            kaggle: canonical_items(self.kaggle),
            github: canonical_items(self.github),
        }
    }
}

fn canonical_items<T: Canonical>(items: Vec<ResourceItem<T>>) -> Vec<ResourceItem<T>> {
    items
        .into_iter()
        .map(|item| item.map(Canonical::canonical))
        .collect()
}
