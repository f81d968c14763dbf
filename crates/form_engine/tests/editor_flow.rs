use form_engine::{
    reorder, DraftError, EditorState, FieldDefinition, FieldDescriptor, FieldId, FieldKind,
    FormDefinitionEditor, FormError, SaveOutcome, SelectOption, SequentialIds,
};
use pretty_assertions::assert_eq;

/// Owner that counts how often it was told about a new definition.
#[derive(Default)]
struct Owner {
    definition: FieldDefinition,
    updates: usize,
}

impl form_engine::DefinitionOwner for Owner {
    fn form_definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn update_form_definition(&mut self, definition: FieldDefinition) {
        self.definition = definition;
        self.updates += 1;
    }
}

fn editor() -> FormDefinitionEditor<SequentialIds> {
    FormDefinitionEditor::with_ids(SequentialIds::default())
}

fn owner_with(fields: Vec<FieldDescriptor>) -> Owner {
    Owner {
        definition: FieldDefinition::new(fields),
        updates: 0,
    }
}

#[test]
fn duplicate_name_on_create_is_rejected() {
    let mut owner = owner_with(vec![FieldDescriptor::new("a", "age", FieldKind::Number)]);
    let mut ed = editor();
    ed.draft_mut().name = "age".into();
    ed.draft_mut().kind = Some(FieldKind::Text);

    let err = ed.save(&mut owner).unwrap_err();
    assert!(matches!(err, FormError::Draft(_)));
    assert_eq!(
        ed.errors().iter().cloned().collect::<Vec<_>>(),
        vec![DraftError::DuplicateName("age".into())]
    );
    assert_eq!(owner.definition.len(), 1);
    assert_eq!(owner.updates, 0);
    assert_eq!(ed.state(), &EditorState::Idle);
    // the rejected input stays in the form so the author can fix it
    assert_eq!(ed.draft().name, "age");
}

#[test]
fn unchanged_edit_round_trips() {
    let original = vec![
        FieldDescriptor::new("h", "intro", FieldKind::Header).label("Introduction"),
        FieldDescriptor::new("c", "color", FieldKind::Select)
            .label("Colour")
            .required(true)
            .default_value("r")
            .description("Pick one")
            .options(vec![
                SelectOption::new("r", "Red"),
                SelectOption::new("g", "Green"),
            ]),
        FieldDescriptor::new("n", "count", FieldKind::Number).default_value("2"),
    ];
    let mut owner = owner_with(original.clone());
    let mut ed = editor();

    for field in &original {
        ed.select_for_edit(&field.id, &owner).unwrap();
        let outcome = ed.save(&mut owner).unwrap();
        assert_eq!(outcome, SaveOutcome::Updated(field.id.clone()));
    }
    assert_eq!(owner.definition, FieldDefinition::new(original));
    assert_eq!(owner.updates, 3);
}

#[test]
fn editing_keeps_its_own_name() {
    let mut owner = owner_with(vec![
        FieldDescriptor::new("a", "age", FieldKind::Number),
        FieldDescriptor::new("b", "name", FieldKind::Text),
    ]);
    let mut ed = editor();
    ed.select_for_edit(&FieldId::new("a"), &owner).unwrap();
    ed.draft_mut().label = "Age in years".into();

    ed.save(&mut owner).unwrap();
    assert_eq!(owner.definition[0].name, "age");
    assert_eq!(owner.definition[0].label.as_deref(), Some("Age in years"));
}

#[test]
fn create_parses_delimited_options() {
    let mut owner = Owner::default();
    let mut ed = editor();
    let draft = ed.draft_mut();
    draft.name = "color".into();
    draft.kind = Some(FieldKind::Select);
    draft.set_options_text("Red; Blue ;Green");

    assert_eq!(
        ed.save(&mut owner).unwrap(),
        SaveOutcome::Created(FieldId::new("field-1"))
    );
    assert_eq!(
        owner.definition[0].options,
        vec![
            SelectOption::new("Red", "Red"),
            SelectOption::new("Blue", "Blue"),
            SelectOption::new("Green", "Green"),
        ]
    );
}

#[test]
fn removing_the_edited_field_returns_to_idle() {
    let mut owner = owner_with(vec![
        FieldDescriptor::new("a", "age", FieldKind::Number),
        FieldDescriptor::new("b", "bio", FieldKind::Textarea),
    ]);
    let mut ed = editor();
    let id = FieldId::new("a");
    ed.select_for_edit(&id, &owner).unwrap();

    let prompt = ed.request_remove(&id, &owner).unwrap();
    assert_eq!(prompt.message, "Do you really want to delete this field?");
    assert_eq!(ed.resolve_removal(true, &mut owner), Some(id));

    assert_eq!(owner.definition.len(), 1);
    assert_eq!(owner.definition[0].name, "bio");
    assert_eq!(ed.state(), &EditorState::Idle);
    assert!(ed.draft().name.is_empty());
}

#[test]
fn saving_an_edit_whose_target_vanished_fails() {
    let mut owner = owner_with(vec![FieldDescriptor::new("a", "age", FieldKind::Number)]);
    let mut ed = editor();
    ed.select_for_edit(&FieldId::new("a"), &owner).unwrap();
    owner.definition = FieldDefinition::default();

    assert!(matches!(
        ed.save(&mut owner),
        Err(FormError::UnknownField(_))
    ));
    assert_eq!(ed.state(), &EditorState::Idle);
}

#[test]
fn reorder_moves_without_touching_fields_or_state() {
    let a = FieldDescriptor::new("a", "a", FieldKind::Text).required(true);
    let b = FieldDescriptor::new("b", "b", FieldKind::Boolean).default_value("true");
    let c = FieldDescriptor::new("c", "c", FieldKind::Header);
    let mut owner = owner_with(vec![a.clone(), b.clone(), c.clone()]);
    let mut ed = editor();
    ed.select_for_edit(&FieldId::new("b"), &owner).unwrap();
    ed.draft_mut().description = "typed before the drop".into();

    let new_order = reorder(&owner.definition, 2, 0);
    ed.reorder(new_order, &mut owner);

    assert_eq!(owner.definition, FieldDefinition::new(vec![c, a, b]));
    assert!(ed.is_editing(&FieldId::new("b")));
    assert_eq!(ed.draft().description, "typed before the drop");
}

#[test]
fn move_field_is_index_based() {
    let mut owner = owner_with(vec![
        FieldDescriptor::new("a", "a", FieldKind::Text),
        FieldDescriptor::new("b", "b", FieldKind::Text),
        FieldDescriptor::new("c", "c", FieldKind::Text),
    ]);
    let mut ed = editor();
    ed.move_field(0, 2, &mut owner);
    let names: Vec<&str> = owner.definition.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c", "a"]);
    assert!(owner.definition.check_invariants().is_ok());
}
