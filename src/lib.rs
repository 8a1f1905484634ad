//! neural-field: animated particle backgrounds for landing pages.
//!
//! This crate provides a WASM canvas component that renders decorative node
//! networks (free-floating graphs, "neural" meshes, and a spinning globe) with
//! distance-faded edges and pulsing glows.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// UI components.
pub mod components;

pub use components::particle_field::{
	FieldConfig, ParticleField, ParticleFieldCanvas, RecordingSurface, Surface, SurfaceSize,
	Variant,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("neural-field: logging initialized");
}

/// Load a field configuration from a script element with the given id.
/// Expected format: JSON, e.g. `{ "variant": "neural", "count": 30 }`.
fn load_field_config(id: &str) -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match FieldConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"neural-field: loaded {:?} config with {} bodies",
				config.variant, config.count
			);
			Some(config)
		}
		Err(e) => {
			warn!("neural-field: ignoring #{}: {}", id, e);
			None
		}
	}
}

/// Demo page mounting one field of each variant.
/// The hero field can be overridden from `<script id="field-config">`.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let hero = load_field_config("field-config").unwrap_or_else(FieldConfig::network);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Memory for AI" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main>
			<section class="field-host hero">
				<ParticleFieldCanvas config=hero />
				<h1>"Memory for AI"</h1>
			</section>
			<section class="field-host about">
				<ParticleFieldCanvas variant=Variant::Neural opacity=0.4 />
				<h2>"How it remembers"</h2>
			</section>
			<section class="field-host contact">
				<ParticleFieldCanvas variant=Variant::Globe />
				<h2>"Get in touch"</h2>
			</section>
		</main>
	}
}
