use std::fmt::Write as _;

use mixo_core::recipe::{Ingredient, Step};
use mixo_core::{Recipe, ServingScale};

/// Plain-text rendering of a converted recipe at the scale's current serving count.
pub fn render_recipe(recipe: &Recipe, scale: &ServingScale) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", recipe.name);
    if !recipe.description.trim().is_empty() {
        let _ = writeln!(out, "{}", recipe.description.trim());
    }

    let mut meta = Vec::new();
    if let Some(t) = &recipe.prep_time {
        meta.push(format!("Prep: {t}"));
    }
    if let Some(t) = &recipe.total_time {
        meta.push(format!("Total: {t}"));
    }
    if scale.current() == scale.original() {
        meta.push(format!("Serves: {}", scale.current()));
    } else {
        meta.push(format!(
            "Serves: {} (recipe serves {})",
            scale.current(),
            scale.original()
        ));
    }
    let _ = writeln!(out, "{}\n", meta.join(" | "));

    let _ = writeln!(out, "INGREDIENTS");
    for ing in scale.ingredients(recipe) {
        let _ = writeln!(out, "- {}", ingredient_line(&ing));
    }

    let _ = writeln!(out, "\nSTEPS");
    for step in &recipe.steps {
        render_step(&mut out, step);
    }

    if !recipe.tips.is_empty() {
        let _ = writeln!(out, "\nPRO TIPS");
        for tip in &recipe.tips {
            let _ = writeln!(out, "• {tip}");
        }
    }
    out
}

/// Pretty JSON of the recipe at the scale's current serving count.
pub fn recipe_json(recipe: &Recipe, scale: &ServingScale) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&scale.scaled_recipe(recipe))
}

fn ingredient_line(ing: &Ingredient) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Some(amount) = &ing.amount {
        parts.push(amount.to_string());
    }
    if let Some(unit) = ing.unit.as_deref().filter(|u| !u.is_empty()) {
        parts.push(unit.to_owned());
    }
    parts.push(ing.item.clone());
    parts.join(" ")
}

fn render_step(out: &mut String, step: &Step) {
    let _ = writeln!(out, "{}. {}", step.step_number, step.title);
    if !step.instruction.is_empty() {
        let _ = writeln!(out, "   {}", step.instruction);
    }

    let s = &step.settings;
    let mut settings = Vec::new();
    if let Some(speed) = s.speed.as_deref().filter(|v| !v.is_empty()) {
        settings.push(format!("SPEED {speed}"));
    }
    if s.is_heated()
        && let Some(temp) = &s.temp
    {
        settings.push(format!("TEMP {}°C", temp.trim()));
    }
    if let Some(time) = s.time.as_deref().filter(|v| !v.is_empty()) {
        settings.push(format!("TIME {time}"));
    }
    if s.reverse == Some(true) {
        settings.push("REVERSE".to_owned());
    }
    if s.mc == Some(false) {
        settings.push("MC Remove".to_owned());
    }
    if !settings.is_empty() {
        let _ = writeln!(out, "   {}", settings.join(" | "));
    }

    if let Some(note) = step.note.as_deref().filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "   Note: {note}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> Recipe {
        serde_json::from_value(serde_json::json!({
            "name": "Tomato Soup",
            "description": "Quick weeknight soup",
            "prepTime": "10 min",
            "totalTime": "30 min",
            "servings": 4,
            "ingredients": [
                {"amount": 500, "unit": "g", "item": "tomatoes"},
                {"amount": "a pinch", "item": "salt"}
            ],
            "steps": [
                {
                    "stepNumber": 1,
                    "title": "Chop",
                    "instruction": "Chop tomatoes",
                    "settings": {"speed": "5", "temp": "—", "time": "0:05", "mc": true}
                },
                {
                    "stepNumber": 2,
                    "title": "Cook",
                    "instruction": "Simmer",
                    "settings": {"speed": "1", "temp": 100, "time": "20:00", "reverse": true, "mc": false},
                    "note": "Stir occasionally"
                }
            ],
            "tips": ["Serve with bread"]
        }))
        .unwrap()
    }

    #[test]
    fn renders_sections_in_order() {
        let r = recipe();
        let text = render_recipe(&r, &ServingScale::new(r.servings));
        let ing = text.find("INGREDIENTS").unwrap();
        let steps = text.find("STEPS").unwrap();
        let tips = text.find("PRO TIPS").unwrap();
        assert!(ing < steps && steps < tips);
        assert!(text.contains("Prep: 10 min | Total: 30 min | Serves: 4"));
        assert!(text.contains("- 500 g tomatoes"));
        assert!(text.contains("- a pinch salt"));
        assert!(text.contains("• Serve with bread"));
    }

    #[test]
    fn unheated_step_hides_temperature() {
        let r = recipe();
        let text = render_recipe(&r, &ServingScale::new(r.servings));
        assert!(text.contains("   SPEED 5 | TIME 0:05\n"));
        assert!(text.contains("   SPEED 1 | TEMP 100°C | TIME 20:00 | REVERSE | MC Remove\n"));
        assert!(text.contains("   Note: Stir occasionally"));
    }

    #[test]
    fn scaled_view_changes_amounts_only() {
        let r = recipe();
        let mut scale = ServingScale::new(r.servings);
        scale.set(6);
        let text = render_recipe(&r, &scale);
        assert!(text.contains("Serves: 6 (recipe serves 4)"));
        assert!(text.contains("- 750 g tomatoes"));
        assert!(text.contains("- a pinch salt"));
    }

    #[test]
    fn json_output_follows_requested_servings() {
        let r = recipe();
        let mut scale = ServingScale::new(r.servings);
        scale.set(8);
        let json: serde_json::Value =
            serde_json::from_str(&recipe_json(&r, &scale).unwrap()).unwrap();
        assert_eq!(json["servings"], 8);
        assert_eq!(json["ingredients"][0]["amount"], 1000);
        assert_eq!(json["ingredients"][1]["amount"], "a pinch");
        assert_eq!(json["steps"][1]["settings"]["temp"], "100");
    }

    #[test]
    fn json_output_unscaled_matches_recipe() {
        let r = recipe();
        let json: serde_json::Value =
            serde_json::from_str(&recipe_json(&r, &ServingScale::new(r.servings)).unwrap())
                .unwrap();
        assert_eq!(json["servings"], 4);
        assert_eq!(json["ingredients"][0]["amount"], 500);
    }
}
