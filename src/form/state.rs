//! Per-node form state.
//!
//! A [`FormState`] owns the fields a node declares at construction time and
//! converts their values to and from a flat string-keyed snapshot, which the
//! graph document stores for the node.

use indexmap::IndexMap;
use log::warn;

use super::field::{FieldSpec, FieldValue};
use super::report::{FieldFailure, RestoreReport};
use crate::error::FormError;

/// Handle to a declared field, returned by [`FormState::declare`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldHandle(usize);

impl FieldHandle {
    /// Position of the field in declaration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A declared field and its current value.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    spec: FieldSpec,
    value: FieldValue,
}

impl Field {
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }
}

/// Named, typed fields of one node, in declaration order.
///
/// # Example
///
/// ```
/// use node_palette::form::{FieldSpec, FormState};
///
/// let mut form = FormState::new();
/// form.declare(FieldSpec::integer("steps", 1, 100, 20)).unwrap();
/// form.declare(FieldSpec::boolean("enabled", true)).unwrap();
///
/// let snapshot = form.snapshot();
/// assert_eq!(snapshot["steps"], "20");
/// assert_eq!(snapshot["enabled"], "True");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    fields: IndexMap<String, Field>,
}

impl FormState {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Declares a field, initialized to its default value.
    ///
    /// Fails with [`FormError::DuplicateField`] if the name is taken; the
    /// form keeps the earlier declaration.
    pub fn declare(&mut self, spec: FieldSpec) -> Result<FieldHandle, FormError> {
        if self.fields.contains_key(&spec.name) {
            return Err(FormError::DuplicateField(spec.name));
        }
        let value = spec.default_value();
        let (index, _) = self
            .fields
            .insert_full(spec.name.clone(), Field { spec, value });
        Ok(FieldHandle(index))
    }

    /// Declares a combo box offering `options`, first option selected.
    pub fn combo_box<I, S>(&mut self, name: &str, options: I) -> Result<FieldHandle, FormError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(FieldSpec::choice(name, options))
    }

    /// Declares a single-line text field.
    pub fn line_edit(
        &mut self,
        name: &str,
        default: Option<&str>,
        placeholder: Option<&str>,
    ) -> Result<FieldHandle, FormError> {
        let mut spec = FieldSpec::text(name, default.unwrap_or_default());
        if let Some(placeholder) = placeholder {
            spec = spec.with_placeholder(placeholder);
        }
        self.declare(spec)
    }

    /// Declares a multi-line text field.
    pub fn text_edit(&mut self, name: &str, placeholder: &str) -> Result<FieldHandle, FormError> {
        self.declare(FieldSpec::text_area(name, "").with_placeholder(placeholder))
    }

    /// Declares an integer spin box.
    pub fn spin_box(
        &mut self,
        name: &str,
        min: i64,
        max: i64,
        default: i64,
        step: i64,
    ) -> Result<FieldHandle, FormError> {
        self.declare(FieldSpec::integer(name, min, max, default).with_step(step as f64))
    }

    /// Declares a floating-point spin box.
    pub fn double_spin_box(
        &mut self,
        name: &str,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    ) -> Result<FieldHandle, FormError> {
        self.declare(FieldSpec::float(name, min, max, default).with_step(step))
    }

    /// Declares a check box.
    pub fn check_box(&mut self, name: &str, checked: bool) -> Result<FieldHandle, FormError> {
        self.declare(FieldSpec::boolean(name, checked))
    }

    /// Returns the current value behind a handle.
    pub fn get(&self, handle: FieldHandle) -> Option<&FieldValue> {
        self.fields.get_index(handle.0).map(|(_, field)| &field.value)
    }

    /// Assigns a value through a handle. See [`FieldSpec::coerce`].
    pub fn set(&mut self, handle: FieldHandle, value: FieldValue) -> Result<(), FormError> {
        let (_, field) = self
            .fields
            .get_index_mut(handle.0)
            .ok_or_else(|| FormError::UnknownField(format!("#{}", handle.0)))?;
        field.value = field.spec.coerce(value)?;
        Ok(())
    }

    /// Returns the current value of the named field.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).map(|field| &field.value)
    }

    /// Assigns a value to the named field. See [`FieldSpec::coerce`].
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> Result<(), FormError> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        field.value = field.spec.coerce(value)?;
        Ok(())
    }

    /// Text of a text or choice field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(FieldValue::as_text)
    }

    /// Value of a numeric field.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(FieldValue::as_number)
    }

    /// Value of a boolean field.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(FieldValue::as_bool)
    }

    /// Handle of the named field.
    pub fn handle(&self, name: &str) -> Option<FieldHandle> {
        self.fields.get_index_of(name).map(FieldHandle)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Puts every field back to its default value.
    pub fn reset(&mut self) {
        for field in self.fields.values_mut() {
            field.value = field.spec.default_value();
        }
    }

    /// Serializes every field to its canonical string, in declaration order.
    pub fn snapshot(&self) -> IndexMap<String, String> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.spec.format(&field.value)))
            .collect()
    }

    /// Best-effort restore from a snapshot.
    ///
    /// Every declared field present in `data` is parsed and assigned. Fields
    /// absent from `data` keep their current value, unknown keys are ignored,
    /// and a field that fails to parse keeps its value without stopping the
    /// others.
    pub fn restore(&mut self, data: &IndexMap<String, String>) -> RestoreReport {
        let mut report = RestoreReport::default();
        for (name, field) in self.fields.iter_mut() {
            let Some(raw) = data.get(name) else {
                continue;
            };
            match field.spec.parse(raw) {
                Ok(value) => {
                    field.value = value;
                    report.applied.push(name.clone());
                }
                Err(reason) => {
                    let failure = FieldFailure::new(name.as_str(), raw.as_str(), reason);
                    warn!("Cannot restore field {}", failure);
                    report.failures.push(failure);
                }
            }
        }
        report
    }

    /// All-or-nothing restore from a snapshot.
    ///
    /// Parses every present field first and assigns nothing if any fails.
    /// Returns the number of fields assigned.
    pub fn restore_strict(&mut self, data: &IndexMap<String, String>) -> Result<usize, FormError> {
        let mut parsed = Vec::new();
        let mut failures = Vec::new();
        for (index, (name, field)) in self.fields.iter().enumerate() {
            let Some(raw) = data.get(name) else {
                continue;
            };
            match field.spec.parse(raw) {
                Ok(value) => parsed.push((index, value)),
                Err(reason) => failures.push(FieldFailure::new(name.as_str(), raw.as_str(), reason)),
            }
        }
        if !failures.is_empty() {
            return Err(FormError::Restore(failures));
        }

        let count = parsed.len();
        for (index, value) in parsed {
            if let Some((_, field)) = self.fields.get_index_mut(index) {
                field.value = value;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldKind;
    use proptest::prelude::*;

    fn snapshot_of(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_form() -> FormState {
        let mut form = FormState::new();
        form.declare(FieldSpec::text("prompt", "a cat")).unwrap();
        form.declare(FieldSpec::integer("steps", 1, 100, 20)).unwrap();
        form.declare(FieldSpec::float("scale", -1000.0, 1000.0, 7.5)).unwrap();
        form.declare(FieldSpec::boolean("enabled", true)).unwrap();
        form.declare(FieldSpec::choice("sampler", ["euler", "ddim", "lms"]))
            .unwrap();
        form
    }

    #[test]
    fn test_declare_defaults() {
        let form = sample_form();
        assert_eq!(form.len(), 5);
        assert_eq!(form.text("prompt"), Some("a cat"));
        assert_eq!(form.number("steps"), Some(20.0));
        assert_eq!(form.flag("enabled"), Some(true));
        assert_eq!(form.text("sampler"), Some("euler"));
    }

    #[test]
    fn test_duplicate_declare_fails() {
        let mut form = FormState::new();
        form.declare(FieldSpec::integer("steps", 1, 100, 20)).unwrap();

        let err = form.declare(FieldSpec::text("steps", "x")).unwrap_err();
        assert_eq!(err, FormError::DuplicateField("steps".to_string()));
        assert_eq!(form.len(), 1);
        assert_eq!(form.number("steps"), Some(20.0));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let form = sample_form();
        let names: Vec<&str> = form.fields().map(Field::name).collect();
        assert_eq!(names, vec!["prompt", "steps", "scale", "enabled", "sampler"]);
        let keys: Vec<String> = form.snapshot().keys().cloned().collect();
        assert_eq!(keys, vec!["prompt", "steps", "scale", "enabled", "sampler"]);
    }

    #[test]
    fn test_handles() {
        let mut form = FormState::new();
        let steps = form.spin_box("steps", 1, 100, 20, 1).unwrap();
        let enabled = form.check_box("enabled", false).unwrap();
        assert_eq!(steps.index(), 0);
        assert_eq!(form.handle("enabled"), Some(enabled));

        form.set(steps, 42_i64.into()).unwrap();
        form.set(enabled, true.into()).unwrap();
        assert_eq!(form.get(steps), Some(&FieldValue::Number(42.0)));
        assert_eq!(form.get(enabled), Some(&FieldValue::Bool(true)));

        assert!(matches!(
            form.set(steps, "many".into()),
            Err(FormError::TypeMismatch { .. })
        ));
        assert_eq!(form.get(steps), Some(&FieldValue::Number(42.0)));
    }

    #[test]
    fn test_set_value_unknown_field() {
        let mut form = sample_form();
        assert_eq!(
            form.set_value("seed", 1_i64.into()),
            Err(FormError::UnknownField("seed".to_string()))
        );
    }

    #[test]
    fn test_widget_helpers() {
        let mut form = FormState::new();
        form.combo_box("model", ["sd15", "sdxl"]).unwrap();
        form.line_edit("prefix", Some("img"), Some("File prefix")).unwrap();
        form.text_edit("notes", "Notes").unwrap();
        form.double_spin_box("strength", 0.0, 1.0, 0.05, 0.75).unwrap();

        assert_eq!(
            form.snapshot(),
            snapshot_of(&[
                ("model", "sd15"),
                ("prefix", "img"),
                ("notes", ""),
                ("strength", "0.75"),
            ])
        );
    }

    #[test]
    fn test_steps_enabled_example() {
        let mut form = FormState::new();
        form.declare(FieldSpec::integer("steps", 1, 100, 20)).unwrap();
        form.declare(FieldSpec::boolean("enabled", true)).unwrap();

        assert_eq!(
            form.snapshot(),
            snapshot_of(&[("steps", "20"), ("enabled", "True")])
        );

        let report = form.restore(&snapshot_of(&[("steps", "7")]));
        assert!(report.succeeded());
        assert_eq!(report.applied, vec!["steps"]);
        assert_eq!(
            form.snapshot(),
            snapshot_of(&[("steps", "7"), ("enabled", "True")])
        );
    }

    #[test]
    fn test_missing_keys_left_unchanged() {
        let mut form = sample_form();
        form.set_value("prompt", "a dog".into()).unwrap();

        form.restore(&snapshot_of(&[("steps", "30"), ("enabled", "False")]));
        assert_eq!(form.text("prompt"), Some("a dog"));
        assert_eq!(form.number("steps"), Some(30.0));
        assert_eq!(form.flag("enabled"), Some(false));
    }

    #[test]
    fn test_parse_failure_does_not_abort() {
        let mut form = sample_form();
        let report = form.restore(&snapshot_of(&[
            ("steps", "lots"),
            ("sampler", "heun"),
            ("scale", "2.5"),
            ("unknown", "ignored"),
        ]));

        assert!(!report.succeeded());
        assert_eq!(report.applied, vec!["scale"]);
        assert_eq!(report.failed_fields().collect::<Vec<_>>(), vec!["steps", "sampler"]);
        assert_eq!(form.number("steps"), Some(20.0));
        assert_eq!(form.text("sampler"), Some("euler"));
        assert_eq!(form.number("scale"), Some(2.5));
    }

    #[test]
    fn test_restore_clamps_out_of_range() {
        let mut form = sample_form();
        form.restore(&snapshot_of(&[("steps", "500")]));
        assert_eq!(form.number("steps"), Some(100.0));
    }

    #[test]
    fn test_restore_strict_all_or_nothing() {
        let mut form = sample_form();
        let err = form
            .restore_strict(&snapshot_of(&[("steps", "30"), ("enabled", "perhaps")]))
            .unwrap_err();
        match err {
            FormError::Restore(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].field, "enabled");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(form.number("steps"), Some(20.0));

        let count = form
            .restore_strict(&snapshot_of(&[("steps", "30"), ("enabled", "False")]))
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(form.number("steps"), Some(30.0));
        assert_eq!(form.flag("enabled"), Some(false));
    }

    #[test]
    fn test_empty_combo_box_round_trips() {
        let mut form = FormState::new();
        form.combo_box("model", Vec::<String>::new()).unwrap();
        form.declare(FieldSpec::new(
            "lora",
            FieldKind::Choice {
                options: vec!["detail".to_string()],
                default: "none".to_string(),
            },
        ))
        .unwrap();

        let snapshot = form.snapshot();
        assert_eq!(snapshot, snapshot_of(&[("model", ""), ("lora", "none")]));

        let report = form.restore(&snapshot);
        assert!(report.succeeded());
        assert_eq!(form.snapshot(), snapshot);
    }

    #[test]
    fn test_reset() {
        let mut form = sample_form();
        form.set_value("steps", 99_i64.into()).unwrap();
        form.set_value("sampler", "lms".into()).unwrap();
        form.reset();
        assert_eq!(form, sample_form());
    }

    proptest! {
        #[test]
        fn test_restore_snapshot_is_idempotent(
            prompt in ".*",
            steps in 1i64..=100,
            scale in -1000.0f64..1000.0,
            enabled in any::<bool>(),
            sampler in prop::sample::select(vec!["euler", "ddim", "lms"]),
        ) {
            let mut form = sample_form();
            form.set_value("prompt", prompt.into()).unwrap();
            form.set_value("steps", steps.into()).unwrap();
            form.set_value("scale", scale.into()).unwrap();
            form.set_value("enabled", enabled.into()).unwrap();
            form.set_value("sampler", sampler.into()).unwrap();

            let snapshot = form.snapshot();
            let mut restored = sample_form();
            let report = restored.restore(&snapshot);
            prop_assert!(report.succeeded());
            prop_assert_eq!(&restored, &form);

            restored.restore(&snapshot);
            prop_assert_eq!(&restored, &form);
            prop_assert_eq!(restored.snapshot(), snapshot);
        }
    }
}
