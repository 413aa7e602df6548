use flagpole::{
    field, segment, Condition, Context, ContextFieldDefinition, FieldType, Operator, Segment,
    Snapshot, ValidationRules,
};

fn main() {
    let snapshot = Snapshot::builder()
        .field(
            ContextFieldDefinition::new("country", FieldType::Country)
                .legal_values(["KR", "US", "JP"])
                .required(),
        )
        .field(ContextFieldDefinition::new("userLevel", FieldType::Number).rules(ValidationRules {
            min: Some(0.0),
            max: Some(100.0),
            integer_only: true,
            ..ValidationRules::default()
        }))
        .field(ContextFieldDefinition::new("appVersion", FieldType::Semver))
        .segment(Segment::new("loop_a", [segment("loop_b")]))
        .segment(Segment::new("loop_b", [segment("loop_a")]))
        .segment(Segment::new(
            "broken",
            [field("userLevel").is(Operator::StrContains, "x")],
        ))
        .build()
        .expect("failed to build snapshot");

    // Conditions as an admin might save them, mistakes included
    let conditions: Vec<Condition> = vec![
        field("country").is_any(Operator::StrIn, ["KR", "FR"]).into(),
        field("appVersion").is(Operator::SemverGte, "1.x").into(),
        field("userLevel").check(Operator::NumGt).into(),
        field("plan").is(Operator::StrEq, "pro").into(),
        field("country").is(Operator::StrRegex, "(unclosed").into(),
        segment("ghost"),
    ];

    println!("Conditions:");
    for error in snapshot.validate_conditions(&conditions) {
        println!("  {error}");
    }

    println!("Segments:");
    for error in snapshot.validate_segments() {
        println!("  {error}");
    }

    let sample = Context::new().set("userLevel", 250.5);
    println!("Sample context:");
    for error in snapshot.validate_context(&sample) {
        println!("  {error}");
    }

    // Validation is advisory; evaluation still fails closed
    println!(
        "Evaluates to: {}",
        snapshot.evaluate_conditions(&conditions, &sample)
    );
}
