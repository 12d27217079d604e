//! Renders a plain-text newsletter issue through a layout, exercising most
//! of the platen surface: folders, shared data, registered functions,
//! extensions, sections, batch pipelines, and a static partial.

use anyhow::Result;
use platen::{Asset, Engine, Template, Uri};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
struct Issue {
    number: u32,
    headline: String,
    stories: Vec<String>,
}

fn build_engine() -> Result<Engine> {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");
    let partials = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/partials");
    let assets = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

    let mut engine = Engine::with_directory(root)?;
    engine.add_folder("partials", partials, false)?;
    engine.add_data([("site".to_string(), json!("Platen Weekly"))].into());
    engine.load_extension(&Asset::new(assets, false))?;
    engine.load_extension(&Uri::new("/newsletter/42"))?;

    engine.add_program("newsletter", |t: &mut Template| {
        let number = t.get("number").cloned().unwrap_or(Value::Null);
        t.layout("shell", [("number".to_string(), number)].into());

        t.start("headline")?;
        let headline = t
            .get("headline")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let headline = t.batch(Value::String(headline), "trim|upper")?;
        t.write(headline.as_str().unwrap_or("").to_string());
        t.stop()?;

        let stories = t
            .get("stories")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        for story in stories {
            let line = t.escape(story.as_str().unwrap_or(""), None)?;
            t.write(format!("* {line}\n"));
        }
        Ok(())
    })?;

    engine.add_program("shell", |t: &mut Template| {
        let site = t.get("site").and_then(|v| v.as_str()).unwrap_or("").to_string();
        let number = t.get("number").and_then(|v| v.as_u64()).unwrap_or(0);
        t.write(format!("{site}, issue #{number}\n"));
        t.write(format!("== {} ==\n\n", t.section_or("headline", "untitled")));
        t.write(t.section_or("content", "").to_string());
        t.write("\n");
        t.insert("partials::footer", Default::default())?;

        let css = t.call("asset", &[json!("site.css")])?;
        let location = t.call("uri", &[])?;
        t.write(format!(
            "\nstyles: {}\nyou are reading {}\n",
            css.as_str().unwrap_or(""),
            location.as_str().unwrap_or(""),
        ));
        Ok(())
    })?;

    Ok(engine)
}

fn main() -> Result<()> {
    let engine = build_engine()?;

    let issue = Issue {
        number: 42,
        headline: "  composing templates without a template language  ".into(),
        stories: vec![
            "Layouts & sections, now in Rust".into(),
            "Folder namespaces with fallback".into(),
            "Cache-busted assets via <asset>".into(),
        ],
    };

    let output = engine.render("newsletter", platen::to_template_data(&issue)?)?;
    println!("{output}");
    Ok(())
}
