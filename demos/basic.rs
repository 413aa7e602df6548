use flagpole::{field, Context, ContextFieldDefinition, FieldType, Flag, Operator, Snapshot};

fn main() {
    // Declare the context fields the admin tool knows about
    let snapshot = Snapshot::builder()
        .field(ContextFieldDefinition::new("country", FieldType::Country))
        .field(ContextFieldDefinition::new("appVersion", FieldType::Semver))
        .build()
        .expect("failed to build snapshot");

    println!("{snapshot}");

    let flag = Flag::builder("new_checkout")
        .strategy("kr_recent", "enabled", |s| {
            s.when(field("country").is_any(Operator::StrIn, ["KR", "US"]))
                .when(field("appVersion").is(Operator::SemverGte, "1.2.0"))
        })
        .build();

    // Evaluate against a context
    let ctx = Context::new()
        .set("country", "KR")
        .set("appVersion", "1.4.2");

    println!("Result: {}", snapshot.evaluate_flag(&flag, &ctx));

    let ctx = Context::new()
        .set("country", "KR")
        .set("appVersion", "1.1.9");

    println!("Result (old app): {}", snapshot.evaluate_flag(&flag, &ctx));
}
