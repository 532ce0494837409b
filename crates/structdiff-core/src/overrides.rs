//! Comparer overrides and their resolution
//!
//! Overrides are indexed four ways. Resolution for a member walks the
//! [`ResolverStage`]s in order and stops at the first stage with a match;
//! two or more matches within one stage are an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::{CompareError, Result};
use crate::reflect::{MemberInfo, TypeDesc};
use crate::value_comparer::ValueComparer;

/// Predicate over members, used as an override filter or a global predicate
pub type MemberFilter = Arc<dyn Fn(&MemberInfo) -> bool + Send + Sync>;

/// Precedence tiers of override resolution, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverStage {
    Member,
    Name,
    Type,
    Predicate,
}

impl ResolverStage {
    pub const ORDER: [ResolverStage; 4] = [
        ResolverStage::Member,
        ResolverStage::Name,
        ResolverStage::Type,
        ResolverStage::Predicate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolverStage::Member => "member",
            ResolverStage::Name => "name",
            ResolverStage::Type => "type",
            ResolverStage::Predicate => "predicate",
        }
    }
}

#[derive(Clone)]
struct FilteredOverride {
    label: String,
    comparer: Arc<dyn ValueComparer>,
    filter: Option<MemberFilter>,
}

impl FilteredOverride {
    fn accepts(&self, member: &MemberInfo) -> bool {
        self.filter.as_ref().map_or(true, |f| f(member))
    }
}

/// Registered overrides of one comparer
///
/// Comparers hold it behind an `Arc`; registering on a comparer that has
/// already handed a snapshot to a child copies the collection first.
#[derive(Clone, Default)]
pub struct OverridesCollection {
    by_member: BTreeMap<(String, String), FilteredOverride>,
    by_name: BTreeMap<String, Vec<FilteredOverride>>,
    by_type: BTreeMap<String, Vec<FilteredOverride>>,
    by_predicate: Vec<FilteredOverride>,
}

impl std::fmt::Debug for OverridesCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverridesCollection")
            .field("members", &self.by_member.len())
            .field("names", &self.by_name.len())
            .field("types", &self.by_type.len())
            .field("predicates", &self.by_predicate.len())
            .finish()
    }
}

impl OverridesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_member.is_empty()
            && self.by_name.is_empty()
            && self.by_type.is_empty()
            && self.by_predicate.is_empty()
    }

    /// Override one exact member; a second registration for it is rejected
    pub fn add_member_override(
        &mut self,
        member: &MemberInfo,
        comparer: Arc<dyn ValueComparer>,
    ) -> Result<()> {
        let key = (
            member.declaring_type().to_string(),
            member.name().to_string(),
        );
        if self.by_member.contains_key(&key) {
            return Err(CompareError::DuplicateOverride {
                member: member.qualified_name(),
            });
        }
        self.by_member.insert(
            key,
            FilteredOverride {
                label: format!("member[{}]", member.qualified_name()),
                comparer,
                filter: None,
            },
        );
        Ok(())
    }

    /// Override every member or value of a type
    pub fn add_type_override(
        &mut self,
        ty: &TypeDesc,
        comparer: Arc<dyn ValueComparer>,
        filter: Option<MemberFilter>,
    ) {
        let entries = self.by_type.entry(ty.name().to_string()).or_default();
        entries.push(FilteredOverride {
            label: format!("type[{}]#{}", ty.name(), entries.len()),
            comparer,
            filter,
        });
    }

    /// Override every member with the given name
    pub fn add_name_override(
        &mut self,
        name: &str,
        comparer: Arc<dyn ValueComparer>,
        filter: Option<MemberFilter>,
    ) {
        let entries = self.by_name.entry(name.to_string()).or_default();
        entries.push(FilteredOverride {
            label: format!("name[{}]#{}", name, entries.len()),
            comparer,
            filter,
        });
    }

    /// Override every member the predicate accepts
    pub fn add_predicate_override(&mut self, predicate: MemberFilter, comparer: Arc<dyn ValueComparer>) {
        self.by_predicate.push(FilteredOverride {
            label: format!("predicate#{}", self.by_predicate.len()),
            comparer,
            filter: Some(predicate),
        });
    }

    /// Effective override for a member, member > name > type > predicate
    pub fn resolve_member(&self, member: &MemberInfo) -> Result<Option<Arc<dyn ValueComparer>>> {
        for stage in ResolverStage::ORDER {
            if let Some(found) = self.resolve_stage(stage, member)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Candidates of a single stage
    pub fn resolve_stage(
        &self,
        stage: ResolverStage,
        member: &MemberInfo,
    ) -> Result<Option<Arc<dyn ValueComparer>>> {
        let candidates: Vec<&FilteredOverride> = match stage {
            ResolverStage::Member => self
                .by_member
                .get(&(
                    member.declaring_type().to_string(),
                    member.name().to_string(),
                ))
                .into_iter()
                .collect(),
            ResolverStage::Name => self
                .by_name
                .get(member.name())
                .into_iter()
                .flatten()
                .filter(|o| o.accepts(member))
                .collect(),
            ResolverStage::Type => self
                .by_type
                .get(member.declared_type().name())
                .into_iter()
                .flatten()
                .filter(|o| o.accepts(member))
                .collect(),
            ResolverStage::Predicate => {
                self.by_predicate.iter().filter(|o| o.accepts(member)).collect()
            }
        };
        single(stage, member.qualified_name(), candidates)
    }

    /// Unfiltered type override for a value compared outside any member
    pub fn resolve_type(&self, ty: &TypeDesc) -> Result<Option<Arc<dyn ValueComparer>>> {
        let candidates = self
            .by_type
            .get(ty.name())
            .into_iter()
            .flatten()
            .filter(|o| o.filter.is_none())
            .collect();
        single(ResolverStage::Type, ty.name().to_string(), candidates)
    }
}

fn single(
    stage: ResolverStage,
    target: String,
    candidates: Vec<&FilteredOverride>,
) -> Result<Option<Arc<dyn ValueComparer>>> {
    match candidates.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(Arc::clone(&only.comparer))),
        many => Err(CompareError::AmbiguousOverride {
            stage: stage.as_str(),
            target,
            candidates: many.iter().map(|o| o.label.clone()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::Value;
    use crate::settings::ComparisonSettings;
    use crate::value_comparer::{AlwaysEqualComparer, IgnoreCaseComparer};

    fn string() -> TypeDesc {
        TypeDesc::primitive("String", Value::Str(String::new()))
    }

    fn member(declaring: &str, name: &str) -> MemberInfo {
        MemberInfo::new(name, string(), declaring)
    }

    fn always() -> Arc<dyn ValueComparer> {
        Arc::new(AlwaysEqualComparer)
    }

    /// True when the resolved comparer behaves like AlwaysEqualComparer
    fn is_always(c: &Arc<dyn ValueComparer>) -> bool {
        c.equal(
            &Value::Str("a".into()),
            &Value::Str("b".into()),
            &ComparisonSettings::default(),
        )
    }

    #[test]
    fn test_duplicate_member_override_rejected() {
        let mut overrides = OverridesCollection::new();
        let m = member("Customer", "email");
        overrides.add_member_override(&m, always()).expect("first");
        let err = overrides.add_member_override(&m, always()).unwrap_err();
        assert_eq!(
            err,
            CompareError::DuplicateOverride {
                member: "Customer.email".into()
            }
        );
    }

    #[test]
    fn test_member_stage_beats_name_stage() {
        let mut overrides = OverridesCollection::new();
        let m = member("Customer", "email");
        overrides.add_name_override("email", Arc::new(IgnoreCaseComparer), None);
        overrides.add_member_override(&m, always()).expect("register");
        let resolved = overrides.resolve_member(&m).expect("resolves").expect("found");
        assert!(is_always(&resolved));
    }

    #[test]
    fn test_name_stage_beats_type_stage() {
        let mut overrides = OverridesCollection::new();
        overrides.add_type_override(&string(), Arc::new(IgnoreCaseComparer), None);
        overrides.add_name_override("email", always(), None);
        let resolved = overrides
            .resolve_member(&member("Customer", "email"))
            .expect("resolves")
            .expect("found");
        assert!(is_always(&resolved));
    }

    #[test]
    fn test_disjoint_type_filters_are_not_ambiguous() {
        let mut overrides = OverridesCollection::new();
        overrides.add_type_override(
            &string(),
            always(),
            Some(Arc::new(|m: &MemberInfo| m.name() == "a")),
        );
        overrides.add_type_override(
            &string(),
            Arc::new(IgnoreCaseComparer),
            Some(Arc::new(|m: &MemberInfo| m.name() == "b")),
        );
        let a = overrides.resolve_member(&member("T", "a")).expect("a");
        assert!(a.map(|c| is_always(&c)).unwrap_or(false));
        let c = overrides.resolve_member(&member("T", "c")).expect("c");
        assert!(c.is_none());
    }

    #[test]
    fn test_overlapping_name_overrides_are_ambiguous() {
        let mut overrides = OverridesCollection::new();
        overrides.add_name_override("email", always(), None);
        overrides.add_name_override("email", Arc::new(IgnoreCaseComparer), None);
        match overrides.resolve_member(&member("Customer", "email")) {
            Err(CompareError::AmbiguousOverride {
                stage, candidates, ..
            }) => {
                assert_eq!(stage, "name");
                assert_eq!(candidates, vec!["name[email]#0", "name[email]#1"]);
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected ambiguity"),
        }
    }

    #[test]
    fn test_resolve_type_ignores_filtered_overrides() {
        let mut overrides = OverridesCollection::new();
        overrides.add_type_override(&string(), always(), Some(Arc::new(|_: &MemberInfo| true)));
        assert!(overrides.resolve_type(&string()).expect("ok").is_none());
        overrides.add_type_override(&string(), always(), None);
        assert!(overrides.resolve_type(&string()).expect("ok").is_some());
    }

    #[test]
    fn test_predicate_stage_is_last() {
        let mut overrides = OverridesCollection::new();
        overrides.add_predicate_override(Arc::new(|m: &MemberInfo| m.name().ends_with("_at")), always());
        assert!(overrides
            .resolve_stage(ResolverStage::Predicate, &member("Order", "created_at"))
            .expect("ok")
            .is_some());
        assert!(overrides
            .resolve_stage(ResolverStage::Name, &member("Order", "created_at"))
            .expect("ok")
            .is_none());
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let mut parent = OverridesCollection::new();
        let snapshot = parent.clone();
        parent.add_name_override("email", always(), None);
        assert!(snapshot.is_empty());
        assert!(!parent.is_empty());
    }
}
