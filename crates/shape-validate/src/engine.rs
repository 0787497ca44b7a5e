//! # Structural Traversal
//!
//! The single recursive procedure that walks a value against a descriptor.
//! It is shared by every leaf policy: primitive and literal leaves are
//! delegated to the [`LeafPolicy`], everything structural happens here.
//!
//! ## Termination
//!
//! Each descent into a list element, struct field or record entry consumes
//! one level of the input, and the input is finite. Deferred references are
//! the only way back into a descriptor without consuming input. Entering a
//! reference that is already being followed at the same input position, or
//! following more than [`MAX_DEFERRED_HOPS`] of them there, is reported as
//! [`ErrorKind::CyclicReference`]. Container nesting beyond
//! `max_depth` is reported as [`ErrorKind::DepthExceeded`].

use serde_json::{Map, Value};
use shape_core::{Deferred, Fields, Schema, MAX_DEFERRED_HOPS};

use crate::error::{ErrorKind, Path, PathSegment, ValidationError, ValidationErrors};
use crate::options::ErrorMode;
use crate::policy::{LeafPolicy, LeafResult};

pub(crate) type Outcome = Result<Value, ValidationErrors>;

/// State of one validation call.
pub(crate) struct Traversal<'a> {
    policy: &'a dyn LeafPolicy,
    collect_all: bool,
    max_depth: usize,
    path: Vec<PathSegment>,
    /// Deferred references being followed since the last descent into the
    /// value.
    entered: Vec<Deferred>,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(policy: &'a dyn LeafPolicy, error_mode: ErrorMode, max_depth: usize) -> Self {
        Self {
            policy,
            collect_all: error_mode == ErrorMode::CollectAll,
            max_depth,
            path: Vec::new(),
            entered: Vec::new(),
        }
    }

    pub(crate) fn run(mut self, schema: &Schema, value: &Value) -> Outcome {
        self.visit(schema, value, 0)
    }

    fn visit(&mut self, schema: &Schema, value: &Value, depth: usize) -> Outcome {
        match schema {
            Schema::Number => self.leaf(self.policy.number(value)),
            Schema::Int => self.leaf(self.policy.int(value)),
            Schema::Float => self.leaf(self.policy.float(value)),
            Schema::String => self.leaf(self.policy.string(value)),
            Schema::Boolean => self.leaf(self.policy.boolean(value)),
            Schema::Id => self.leaf(self.policy.id(value)),
            Schema::Literal(literal) => self.leaf(self.policy.literal(literal, value)),
            Schema::Nullable(inner) => {
                if value.is_null() {
                    Ok(Value::Null)
                } else {
                    self.visit(inner, value, depth)
                }
            }
            Schema::List(element) => self.list(element, value, depth),
            Schema::Struct(fields) => self.fields(fields, value, depth),
            Schema::Object(object) => self.fields(object.fields(), value, depth),
            Schema::Union(members) => self.union(schema, members, value, depth),
            Schema::Intersect(members) => self.intersect(members, value, depth),
            Schema::Record(item) => self.record(item, value, depth),
            Schema::Json => self.json(value, depth),
            Schema::Any => Ok(value.clone()),
            Schema::Deferred(deferred) => self.deferred(deferred, value, depth),
        }
    }

    fn leaf(&self, result: LeafResult) -> Outcome {
        result.map_err(|kind| self.fail(kind))
    }

    fn list(&mut self, element: &Schema, value: &Value, depth: usize) -> Outcome {
        let Value::Array(items) = value else {
            return Err(self.fail(ErrorKind::shape_mismatch("list", value)));
        };
        self.enter(depth)?;

        let mut output = Vec::with_capacity(items.len());
        let mut errors = None;
        for (index, item) in items.iter().enumerate() {
            match self.descend(PathSegment::Index(index), element, item, depth) {
                Ok(accepted) => output.push(accepted),
                Err(failure) => {
                    if !self.absorb(&mut errors, failure) {
                        break;
                    }
                }
            }
        }
        finish(errors, Value::Array(output))
    }

    /// Struct and object types: declared fields only, in declaration order.
    fn fields(&mut self, fields: &Fields, value: &Value, depth: usize) -> Outcome {
        let Value::Object(input) = value else {
            return Err(self.fail(ErrorKind::shape_mismatch("object", value)));
        };
        self.enter(depth)?;

        let mut output = Map::new();
        let mut errors = None;
        for (name, field) in fields.iter() {
            let segment = PathSegment::Key(name.to_string());
            let outcome = match input.get(name) {
                Some(item) => self.descend(segment, field.schema(), item, depth).map(Some),
                None if field.schema().accepts_absent() => Ok(None),
                None => Err(self.fail_at(
                    segment,
                    ErrorKind::MissingField {
                        field: name.to_string(),
                    },
                )),
            };
            match outcome {
                Ok(Some(accepted)) => {
                    output.insert(name.to_string(), accepted);
                }
                Ok(None) => {}
                Err(failure) => {
                    if !self.absorb(&mut errors, failure) {
                        break;
                    }
                }
            }
        }
        finish(errors, Value::Object(output))
    }

    fn record(&mut self, item: &Schema, value: &Value, depth: usize) -> Outcome {
        let Value::Object(input) = value else {
            return Err(self.fail(ErrorKind::shape_mismatch("object", value)));
        };
        self.enter(depth)?;

        let mut output = Map::new();
        let mut errors = None;
        for (key, entry) in input {
            match self.descend(PathSegment::Key(key.clone()), item, entry, depth) {
                Ok(accepted) => {
                    output.insert(key.clone(), accepted);
                }
                Err(failure) => {
                    if !self.absorb(&mut errors, failure) {
                        break;
                    }
                }
            }
        }
        finish(errors, Value::Object(output))
    }

    /// First member to accept wins. Member attempts are always fail-fast.
    fn union(
        &mut self,
        schema: &Schema,
        members: &[Schema],
        value: &Value,
        depth: usize,
    ) -> Outcome {
        let collect_all = std::mem::replace(&mut self.collect_all, false);
        let mut attempts = Vec::with_capacity(members.len());
        let mut accepted = None;
        for (index, member) in members.iter().enumerate() {
            match self.visit(member, value, depth) {
                Ok(output) => {
                    accepted = Some(output);
                    break;
                }
                Err(failure) => {
                    tracing::trace!(
                        member = index,
                        error = %failure.first(),
                        "union member rejected value"
                    );
                    attempts.extend(failure.into_vec().into_iter().next());
                }
            }
        }
        self.collect_all = collect_all;

        match accepted {
            Some(output) => Ok(output),
            None => Err(self.fail(ErrorKind::NoUnionMemberMatched {
                expected: schema.to_string(),
                attempts,
            })),
        }
    }

    /// Every member must accept; outputs are merged in member order.
    fn intersect(&mut self, members: &[Schema], value: &Value, depth: usize) -> Outcome {
        let mut merged: Option<Value> = None;
        for (index, member) in members.iter().enumerate() {
            let output = match self.visit(member, value, depth) {
                Ok(output) => output,
                Err(causes) => {
                    return Err(self.fail(ErrorKind::IntersectMemberFailed {
                        member: index,
                        causes,
                    }))
                }
            };
            merged = Some(match merged {
                None => output,
                Some(previous) => self.merge(previous, output, index)?,
            });
        }
        Ok(merged.unwrap_or_else(|| value.clone()))
    }

    /// Object outputs merge key-wise; a key produced twice must carry equal
    /// values. Other outputs must be equal outright.
    fn merge(&mut self, previous: Value, next: Value, member: usize) -> Outcome {
        match (previous, next) {
            (Value::Object(mut merged), Value::Object(addition)) => {
                for (key, item) in addition {
                    match merged.get(&key) {
                        Some(existing) if *existing != item => {
                            return Err(self.fail_at(
                                PathSegment::Key(key),
                                ErrorKind::IntersectConflict { member },
                            ));
                        }
                        Some(_) => {}
                        None => {
                            merged.insert(key, item);
                        }
                    }
                }
                Ok(Value::Object(merged))
            }
            (previous, next) if previous == next => Ok(previous),
            _ => Err(self.fail(ErrorKind::IntersectConflict { member })),
        }
    }

    fn json(&mut self, value: &Value, depth: usize) -> Outcome {
        match value {
            Value::Array(_) => self.list(&Schema::Json, value, depth),
            Value::Object(_) => self.record(&Schema::Json, value, depth),
            scalar => Ok(scalar.clone()),
        }
    }

    fn deferred(&mut self, deferred: &Deferred, value: &Value, depth: usize) -> Outcome {
        if self.entered.len() >= MAX_DEFERRED_HOPS
            || self.entered.iter().any(|seen| seen.same_target(deferred))
        {
            return Err(self.fail(ErrorKind::CyclicReference));
        }
        let Some(target) = deferred.get() else {
            return Err(self.fail(ErrorKind::UnresolvedReference));
        };
        self.entered.push(deferred.clone());
        let outcome = self.visit(&target, value, depth);
        self.entered.pop();
        outcome
    }

    /// Visit a child value one level down.
    fn descend(
        &mut self,
        segment: PathSegment,
        schema: &Schema,
        value: &Value,
        depth: usize,
    ) -> Outcome {
        self.path.push(segment);
        let entered = std::mem::take(&mut self.entered);
        let outcome = self.visit(schema, value, depth + 1);
        self.entered = entered;
        self.path.pop();
        outcome
    }

    fn enter(&self, depth: usize) -> Result<(), ValidationErrors> {
        if depth >= self.max_depth {
            return Err(self.fail(ErrorKind::DepthExceeded {
                limit: self.max_depth,
            }));
        }
        Ok(())
    }

    /// Record a failure; returns whether the caller should keep going.
    fn absorb(&self, errors: &mut Option<ValidationErrors>, failure: ValidationErrors) -> bool {
        match errors {
            Some(existing) => existing.extend(failure),
            None => *errors = Some(failure),
        }
        self.collect_all
    }

    fn fail(&self, kind: ErrorKind) -> ValidationErrors {
        ValidationErrors::new(ValidationError::new(Path::from(self.path.clone()), kind))
    }

    fn fail_at(&mut self, segment: PathSegment, kind: ErrorKind) -> ValidationErrors {
        self.path.push(segment);
        let failure = self.fail(kind);
        self.path.pop();
        failure
    }
}

fn finish(errors: Option<ValidationErrors>, output: Value) -> Outcome {
    match errors {
        Some(errors) => Err(errors),
        None => Ok(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{NonStrictPolicy, StrictPolicy};
    use serde_json::json;

    fn strict(schema: &Schema, value: &Value) -> Outcome {
        Traversal::new(&StrictPolicy, ErrorMode::FailFast, 128).run(schema, value)
    }

    fn collect(schema: &Schema, value: &Value) -> Outcome {
        Traversal::new(&StrictPolicy, ErrorMode::CollectAll, 128).run(schema, value)
    }

    fn first_path(outcome: Outcome) -> String {
        outcome.unwrap_err().first().path().to_string()
    }

    #[test]
    fn test_list_error_path_has_index() {
        let schema = Schema::list(Schema::Number);
        assert_eq!(first_path(strict(&schema, &json!([1, 2, "3"]))), "/2");
    }

    #[test]
    fn test_list_rejects_non_sequence() {
        let err = strict(&Schema::list(Schema::Number), &json!({"0": 1})).unwrap_err();
        assert_eq!(
            err.first().kind(),
            &ErrorKind::ShapeMismatch {
                expected: "list",
                found: "object",
            }
        );
    }

    #[test]
    fn test_missing_field_path_points_at_field() {
        let schema = Schema::structure()
            .field("a", Schema::Number)
            .field("d", Schema::list(Schema::Number))
            .build()
            .unwrap();
        let err = strict(&schema, &json!({"a": 1})).unwrap_err();
        assert_eq!(err.first().path().to_string(), "/d");
        assert_eq!(
            err.first().kind(),
            &ErrorKind::MissingField { field: "d".into() }
        );
    }

    #[test]
    fn test_fail_fast_stops_at_first_field() {
        let schema = Schema::structure()
            .field("a", Schema::Number)
            .field("b", Schema::String)
            .build()
            .unwrap();
        let err = strict(&schema, &json!({"a": "x", "b": 1})).unwrap_err();
        assert_eq!(err.count(), 1);
        assert_eq!(err.first().path().to_string(), "/a");
    }

    #[test]
    fn test_collect_all_reports_every_field_in_order() {
        let schema = Schema::structure()
            .field("a", Schema::Number)
            .field("b", Schema::String)
            .field("c", Schema::Boolean)
            .build()
            .unwrap();
        let err = collect(&schema, &json!({"a": "x", "b": 1})).unwrap_err();
        let paths: Vec<String> = err.iter().map(|e| e.path().to_string()).collect();
        assert_eq!(paths, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_collect_all_reports_every_element() {
        let err = collect(&Schema::list(Schema::Int), &json!([1, "2", 3, 4.5])).unwrap_err();
        let paths: Vec<String> = err.iter().map(|e| e.path().to_string()).collect();
        assert_eq!(paths, vec!["/1", "/3"]);
    }

    #[test]
    fn test_union_reports_each_member_attempt() {
        let schema = Schema::union([Schema::Number, Schema::Boolean]).unwrap();
        let err = strict(&schema, &json!("x")).unwrap_err();
        let ErrorKind::NoUnionMemberMatched { expected, attempts } = err.first().kind() else {
            panic!("expected NoUnionMemberMatched, got {err}");
        };
        assert_eq!(expected, "Number | Boolean");
        assert_eq!(attempts.len(), 2);
    }

    #[test]
    fn test_union_uses_matching_members_coercion() {
        let schema = Schema::union([Schema::Boolean, Schema::Int]).unwrap();
        let outcome =
            Traversal::new(&NonStrictPolicy, ErrorMode::FailFast, 128).run(&schema, &json!("7"));
        // "7" is not a boolean token, so Int coerces it.
        assert_eq!(outcome.unwrap(), json!(7));
    }

    #[test]
    fn test_intersect_reports_failing_member_index() {
        let a = Schema::structure().field("a", Schema::Number).build().unwrap();
        let b = Schema::structure().field("b", Schema::String).build().unwrap();
        let schema = Schema::intersect([a, b]).unwrap();
        let err = strict(&schema, &json!({"a": 1})).unwrap_err();
        let ErrorKind::IntersectMemberFailed { member, causes } = err.first().kind() else {
            panic!("expected IntersectMemberFailed, got {err}");
        };
        assert_eq!(*member, 1);
        assert_eq!(causes.first().path().to_string(), "/b");
    }

    #[test]
    fn test_intersect_overlapping_fields_must_agree() {
        let a = Schema::structure().field("x", Schema::Number).build().unwrap();
        let b = Schema::structure().field("x", Schema::Int).build().unwrap();
        let schema = Schema::intersect([a, b]).unwrap();
        assert_eq!(strict(&schema, &json!({"x": 2})).unwrap(), json!({"x": 2}));

        // Non-strict: Number keeps 2.5, Int truncates to 2.
        let err = Traversal::new(&NonStrictPolicy, ErrorMode::FailFast, 128)
            .run(&schema, &json!({"x": 2.5}))
            .unwrap_err();
        assert_eq!(err.first().kind(), &ErrorKind::IntersectConflict { member: 1 });
        assert_eq!(err.first().path().to_string(), "/x");
    }

    #[test]
    fn test_intersect_of_primitives() {
        let schema = Schema::intersect([Schema::Number, Schema::Int]).unwrap();
        assert_eq!(strict(&schema, &json!(3)).unwrap(), json!(3));
        assert!(strict(&schema, &json!(3.5)).is_err());
    }

    #[test]
    fn test_record_error_path_has_key() {
        let schema = Schema::record(Schema::Number);
        assert_eq!(first_path(strict(&schema, &json!({"a": 1, "b": "x"}))), "/b");
    }

    #[test]
    fn test_depth_limit() {
        let schema = Schema::Json;
        let shallow = Traversal::new(&StrictPolicy, ErrorMode::FailFast, 2)
            .run(&schema, &json!({"a": [1]}));
        assert!(shallow.is_ok());

        let err = Traversal::new(&StrictPolicy, ErrorMode::FailFast, 2)
            .run(&schema, &json!({"a": [[1]]}))
            .unwrap_err();
        assert_eq!(err.first().kind(), &ErrorKind::DepthExceeded { limit: 2 });
        assert_eq!(err.first().path().to_string(), "/a/0");
    }

    #[test]
    fn test_dangling_reference_is_an_error_not_a_panic() {
        let nested = {
            let tree = Schema::recursive(|tree| {
                Schema::object("Tree")
                    .field("child", Schema::nullable(tree))
                    .build()
            })
            .unwrap();
            tree.resolve().unwrap()
        };
        let err = strict(&nested, &json!({"child": {"child": null}})).unwrap_err();
        assert_eq!(err.first().kind(), &ErrorKind::UnresolvedReference);
        assert_eq!(err.first().path().to_string(), "/child");
    }

    #[test]
    fn test_reference_cycle_without_progress_terminates() {
        let looped = Schema::recursive(|this| Schema::union([Schema::Number, this])).unwrap();
        assert_eq!(strict(&looped, &json!(4)).unwrap(), json!(4));
        assert!(strict(&looped, &json!("x")).is_err());
    }

    #[test]
    fn test_repeated_self_references_are_entered_once() {
        let fanned = Schema::recursive(|this| Schema::union([this.clone(), this, Schema::Number]))
            .unwrap();
        assert_eq!(strict(&fanned, &json!(4)).unwrap(), json!(4));

        let err = strict(&fanned, &json!("x")).unwrap_err();
        let ErrorKind::NoUnionMemberMatched { attempts, .. } = err.first().kind() else {
            panic!("expected NoUnionMemberMatched, got {err}");
        };
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[0].kind(), &ErrorKind::CyclicReference);
        assert_eq!(attempts[1].kind(), &ErrorKind::CyclicReference);

        // An absent field of this type is required and reported as missing.
        let holder = Schema::structure().field("a", fanned).build().unwrap();
        let err = strict(&holder, &json!({})).unwrap_err();
        assert_eq!(err.first().kind(), &ErrorKind::MissingField { field: "a".into() });
    }

    #[test]
    fn test_same_reference_in_sibling_members_is_not_a_cycle() {
        let node = Schema::recursive(|node| {
            Schema::object("Node")
                .field("id", Schema::Int)
                .field("next", Schema::nullable(node))
                .build()
        })
        .unwrap();
        let labelled = Schema::structure()
            .field("label", Schema::String)
            .build()
            .unwrap();
        let either = Schema::union([node.clone(), labelled]).unwrap();
        let both = Schema::intersect([node, either]).unwrap();
        assert_eq!(
            strict(&both, &json!({"id": 1, "next": {"id": 2}})).unwrap(),
            json!({"id": 1, "next": {"id": 2}})
        );
    }
}
