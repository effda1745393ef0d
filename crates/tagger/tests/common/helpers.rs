use tagger_lib::{LabelSourceEntry, PopulationRecord, Record};

/// Eight labelled records covering both schemes, the objects fallback and a
/// record with no tags at all.
pub fn sample_records() -> Vec<Record> {
    vec![
        Record::new("1", "Food Bank")
            .with_tags(["Food", "Poverty"])
            .with_icnptso("F10"),
        Record::new("2", "Soup Kitchen")
            .with_activities("Hot food for homeless people")
            .with_tags(["Food", "Housing"])
            .with_icnptso("F10"),
        Record::new("3", "Food Hall Arts Trust")
            .with_tags(["Arts"])
            .with_icnptso("A11"),
        Record::new("4", "Community Choir")
            .with_objects("Promotion of choral music")
            .with_tags(["Music", "Arts"])
            .with_icnptso("A11"),
        Record::new("5", "Night Shelter")
            .with_objects("Relief of homelessness")
            .with_tags(["Housing"])
            .with_icnptso("H20"),
        Record::new("6", "Pantry")
            .with_objects("Relief of hunger")
            .with_tags(["Food"])
            .with_icnptso("F10"),
        Record::new("7", "Youth Football Club").with_icnptso("S30"),
        Record::new("8", "Brass Band")
            .with_tags(["Music"])
            .with_icnptso("A11"),
    ]
}

pub fn tag_entries() -> Vec<LabelSourceEntry> {
    let mut food = LabelSourceEntry::new("rec-food", "Food");
    food.category = Some("Poverty".to_string());
    food.subcategory = Some("Food".to_string());

    let mut old = LabelSourceEntry::new("rec-old", "Old");
    old.not_used = true;

    vec![
        food,
        LabelSourceEntry::new("rec-housing", "Housing"),
        LabelSourceEntry::new("rec-music", "Music").with_patterns("choir|band", None),
        LabelSourceEntry::new("rec-arts", "Arts"),
        LabelSourceEntry::new("rec-poverty", "Poverty"),
        old,
        LabelSourceEntry::new("rec-sport", "Sport"),
    ]
}

pub fn code_entries() -> Vec<LabelSourceEntry> {
    let code = |id: &str, label: &str, title: &str| {
        let mut entry = LabelSourceEntry::new(id, label);
        entry.title = Some(title.to_string());
        entry
    };
    vec![
        code("rec-f10", "F10", "Food and nutrition"),
        code("rec-a11", "A11", "Arts and culture"),
        code("rec-h20", "H20", "Housing"),
        code("rec-s30", "S30", "Sport"),
    ]
}

pub fn population_record(id: usize, name: &str, income: f64) -> PopulationRecord {
    PopulationRecord::new(format!("p{}", id), name).with_income(income)
}
