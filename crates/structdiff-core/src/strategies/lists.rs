//! List reconciliation
//!
//! Pairs the elements of two sequences either by position or by a key, then
//! compares each pair through a child comparer. Options are chosen per list
//! node by the list comparison hook of the settings.

use std::fmt;
use std::sync::Arc;

use crate::diff::{Difference, DifferenceKind, NodeCursor};
use crate::engine::{deferred, failed, single, Comparer, Differences};
use crate::errors::{CompareError, Result};
use crate::reflect::{SeqValue, TypeDesc, Value};

/// Member names tried, in order, by the default key provider
pub const DEFAULT_KEY_MEMBERS: [&str; 7] = ["Id", "ID", "id", "Key", "key", "Name", "name"];

/// Null element identifiers are cut to this many characters
pub const MAX_NULL_IDENTIFIER_LEN: usize = 32;

pub type KeyProvider = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;
pub type KeyFormatter = Arc<dyn Fn(&KeyFormatArgs<'_>) -> String + Send + Sync>;
pub type NullIdentifier = Arc<dyn Fn(usize) -> String + Send + Sync>;

/// Input of the key formatting hook
pub struct KeyFormatArgs<'a> {
    pub index: usize,
    pub key: &'a Value,
    pub element: &'a Value,
}

#[derive(Debug, Clone, Default)]
pub enum ListMode {
    /// Pair elements by position
    #[default]
    Index,
    /// Pair elements by key
    Key(KeyOptions),
}

#[derive(Debug, Clone, Default)]
pub struct ListComparisonOptions {
    pub mode: ListMode,
    /// Keep comparing after reporting a count mismatch
    pub compare_unequal_lists: bool,
}

impl ListComparisonOptions {
    pub fn compare_elements_by_key(&mut self, key: KeyOptions) -> &mut Self {
        self.mode = ListMode::Key(key);
        self
    }

    pub fn compare_elements_by_index(&mut self) -> &mut Self {
        self.mode = ListMode::Index;
        self
    }

    pub fn with_unequal_lists(&mut self, enabled: bool) -> &mut Self {
        self.compare_unequal_lists = enabled;
        self
    }
}

/// Key-mode options
#[derive(Clone)]
pub struct KeyOptions {
    key_provider: Option<KeyProvider>,
    throw_key_not_found: bool,
    key_formatter: Option<KeyFormatter>,
    null_identifier: Option<NullIdentifier>,
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self {
            key_provider: None,
            throw_key_not_found: true,
            key_formatter: None,
            null_identifier: None,
        }
    }
}

impl fmt::Debug for KeyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyOptions")
            .field("custom_key", &self.key_provider.is_some())
            .field("throw_key_not_found", &self.throw_key_not_found)
            .field("custom_format", &self.key_formatter.is_some())
            .field("custom_null_identifier", &self.null_identifier.is_some())
            .finish()
    }
}

impl KeyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key by a single member
    pub fn use_key(self, member: impl Into<String>) -> Self {
        self.use_keys(vec![member.into()])
    }

    /// Key by the first of `members` an element has
    pub fn use_keys(self, members: Vec<String>) -> Self {
        self.use_key_fn(move |element| {
            members
                .iter()
                .find_map(|name| element.member_value(name))
        })
    }

    pub fn use_key_fn(
        mut self,
        provider: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.key_provider = Some(Arc::new(provider));
        self
    }

    /// When false, elements without a key are left out of the comparison
    pub fn throw_key_not_found(mut self, enabled: bool) -> Self {
        self.throw_key_not_found = enabled;
        self
    }

    /// Text placed between the brackets of an element path segment
    pub fn format_key(
        mut self,
        formatter: impl Fn(&KeyFormatArgs<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.key_formatter = Some(Arc::new(formatter));
        self
    }

    /// Identifier of a null element, or of an element whose key is null
    pub fn format_null_element(
        mut self,
        identifier: impl Fn(usize) -> String + Send + Sync + 'static,
    ) -> Self {
        self.null_identifier = Some(Arc::new(identifier));
        self
    }

    fn key_of(&self, element: &Value) -> Option<Value> {
        match &self.key_provider {
            Some(provider) => provider(element),
            None => default_key(element),
        }
    }

    fn segment(&self, index: usize, key: &Value, element: &Value) -> String {
        let text = match &self.key_formatter {
            Some(format) => format(&KeyFormatArgs {
                index,
                key,
                element,
            }),
            None => key.to_string(),
        };
        format!("[{}]", text)
    }

    fn null_segment(&self, index: usize) -> String {
        let id = match &self.null_identifier {
            Some(identify) => identify(index),
            None => format!("NullAtIdx={}", index),
        };
        format!("[{}]", id.chars().take(MAX_NULL_IDENTIFIER_LEN).collect::<String>())
    }
}

/// Scalars are their own key; objects use the first conventional key member
pub fn default_key(element: &Value) -> Option<Value> {
    if element.is_scalar() {
        return Some(element.clone());
    }
    DEFAULT_KEY_MEMBERS
        .iter()
        .find_map(|name| element.member_value(name))
}

/// Reconcile two sequences below `cursor`
pub(crate) fn compare_lists(
    comparer: &Comparer,
    cursor: &NodeCursor,
    left: Arc<SeqValue>,
    right: Arc<SeqValue>,
    element: TypeDesc,
    count_label: &'static str,
) -> Differences {
    let options = comparer.settings().list_options(cursor.context());
    let (n1, n2) = (left.items.len(), right.items.len());

    let mut head = None;
    if n1 != n2 {
        let count = comparer.record(
            cursor,
            Difference::new(
                count_label,
                n1.to_string(),
                n2.to_string(),
                DifferenceKind::CountMismatch,
            ),
        );
        if !options.compare_unequal_lists {
            return single(count);
        }
        head = Some(count);
    }

    let list = ListPair {
        comparer: comparer.clone(),
        cursor: cursor.clone(),
        left,
        right,
        element,
    };
    let rest = match options.mode {
        ListMode::Index => {
            tracing::trace!(left = n1, right = n2, "list compared by index");
            list.by_index()
        }
        ListMode::Key(key) => {
            tracing::trace!(left = n1, right = n2, "list compared by key");
            deferred(move || list.by_key(&key))
        }
    };
    Box::new(head.into_iter().map(Ok).chain(rest))
}

#[derive(Clone)]
struct ListPair {
    comparer: Comparer,
    cursor: NodeCursor,
    left: Arc<SeqValue>,
    right: Arc<SeqValue>,
    element: TypeDesc,
}

enum Step {
    Pair { i: usize, j: usize, segment: String },
    OnlyLeft { i: usize, segment: String },
    OnlyRight { j: usize, segment: String },
}

#[derive(PartialEq)]
enum Identity {
    Key(Value),
    NullAt(usize),
}

struct Keyed {
    index: usize,
    identity: Identity,
    segment: String,
}

impl ListPair {
    fn by_index(self) -> Differences {
        let (n1, n2) = (self.left.items.len(), self.right.items.len());
        let common = n1.min(n2);
        let steps = (0..common)
            .map(|i| Step::Pair {
                i,
                j: i,
                segment: format!("[{}]", i),
            })
            .chain((common..n1).map(|i| Step::OnlyLeft {
                i,
                segment: format!("[{}]", i),
            }))
            .chain((common..n2).map(|j| Step::OnlyRight {
                j,
                segment: format!("[{}]", j),
            }));
        self.run(steps.collect())
    }

    fn by_key(self, key: &KeyOptions) -> Differences {
        let keyed1 = match identify(key, &self.left.items) {
            Ok(keyed) => keyed,
            Err(e) => return failed(e),
        };
        let keyed2 = match identify(key, &self.right.items) {
            Ok(keyed) => keyed,
            Err(e) => return failed(e),
        };

        let mut steps = Vec::new();
        for k1 in &keyed1 {
            match keyed2.iter().find(|k2| k2.identity == k1.identity) {
                Some(k2) => steps.push(Step::Pair {
                    i: k1.index,
                    j: k2.index,
                    segment: k1.segment.clone(),
                }),
                None => steps.push(Step::OnlyLeft {
                    i: k1.index,
                    segment: k1.segment.clone(),
                }),
            }
        }
        for k2 in &keyed2 {
            if !keyed1.iter().any(|k1| k1.identity == k2.identity) {
                steps.push(Step::OnlyRight {
                    j: k2.index,
                    segment: k2.segment.clone(),
                });
            }
        }
        self.run(steps)
    }

    fn run(self, steps: Vec<Step>) -> Differences {
        Box::new(steps.into_iter().flat_map(move |step| self.step(step)))
    }

    fn step(&self, step: Step) -> Differences {
        let comparer = &self.comparer;
        match step {
            Step::Pair { i, j, segment } => {
                let node = self.cursor.add_descendant(None);
                let nested = comparer.nested_differences(
                    &self.element,
                    &self.left.items[i],
                    &self.right.items[j],
                    None,
                    &node,
                );
                comparer.prefixed(nested, &segment, node)
            }
            Step::OnlyLeft { i, segment } => comparer.emit(
                &self.cursor,
                Difference::new(
                    segment,
                    comparer.render(&self.left.items[i]),
                    "",
                    DifferenceKind::MissingInSecond,
                ),
            ),
            Step::OnlyRight { j, segment } => comparer.emit(
                &self.cursor,
                Difference::new(
                    segment,
                    "",
                    comparer.render(&self.right.items[j]),
                    DifferenceKind::MissingInFirst,
                ),
            ),
        }
    }
}

/// Identity and path segment of every element that takes part
fn identify(key: &KeyOptions, items: &[Value]) -> Result<Vec<Keyed>> {
    let mut keyed = Vec::with_capacity(items.len());
    for (index, element) in items.iter().enumerate() {
        if element.is_null() {
            keyed.push(Keyed {
                index,
                identity: Identity::NullAt(index),
                segment: key.null_segment(index),
            });
            continue;
        }
        match key.key_of(element) {
            Some(Value::Null) => keyed.push(Keyed {
                index,
                identity: Identity::NullAt(index),
                segment: key.null_segment(index),
            }),
            Some(k) => keyed.push(Keyed {
                index,
                segment: key.segment(index, &k, element),
                identity: Identity::Key(k),
            }),
            None if key.throw_key_not_found => {
                return Err(CompareError::KeyNotFound {
                    index,
                    element: element.to_string(),
                })
            }
            None => {
                tracing::debug!(index, "list element without key skipped");
            }
        }
    }
    Ok(keyed)
}
