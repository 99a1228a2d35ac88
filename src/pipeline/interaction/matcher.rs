use crate::models::InteractionRule;

/// Narrow the interaction table to rules whose two drug terms both appear
/// among the patient's current and new medications.
///
/// Matching is a case-insensitive substring test in either direction, over
/// every ordered pair of medications (including a medication paired with
/// itself). A rule is emitted once per satisfying pair, so the same rule can
/// appear several times. Output order is table order, then pair order.
pub fn match_interactions(
    current_medications: &[String],
    new_medications: &[String],
    rules: &[InteractionRule],
) -> Vec<InteractionRule> {
    let all_meds: Vec<String> = current_medications
        .iter()
        .chain(new_medications)
        .map(|m| m.to_lowercase())
        .collect();

    rules
        .iter()
        .flat_map(|rule| {
            let hits = pair_hits(rule, &all_meds);
            std::iter::repeat(rule).take(hits)
        })
        .cloned()
        .collect()
}

/// Number of ordered medication pairs that satisfy `rule`.
fn pair_hits(rule: &InteractionRule, lowered_meds: &[String]) -> usize {
    let drug_a = rule.drug_a.to_lowercase();
    let drug_b = rule.drug_b.to_lowercase();

    lowered_meds
        .iter()
        .flat_map(|med1| lowered_meds.iter().map(move |med2| (med1, med2)))
        .filter(|(med1, med2)| {
            (med1.contains(&drug_a) && med2.contains(&drug_b))
                || (med1.contains(&drug_b) && med2.contains(&drug_a))
        })
        .count()
}
