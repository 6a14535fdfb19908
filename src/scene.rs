//! Scene composition
//!
//! Two entry points drive everything the hosts show:
//! - [`initialize`] builds the session state (palette, collators, presets)
//! - [`render_frame`] applies input events and returns one frame of draw
//!   commands plus a hint telling the host whether to keep redrawing
//!
//! Nothing but the background is drawn until every language of the active
//! preset has a resolved number list.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::color::{ColorError, Rgb, Rgba};
use crate::config::Config;
use crate::draw::DrawCommand;
use crate::grid::{draw_dots, draw_grid, GridStyle, MAX_LEVELS};
use crate::layout::{Quadrant, QuadrantLayout};
use crate::palette::{build_palette, ColorRegistry, Palette};
use crate::rank::{LocaleCollator, RankError};

const DOT_DIAMETER: f64 = 2.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("Language '{language}' appears in both {first} and {second} of preset '{preset}'")]
    DuplicateLanguage {
        preset: String,
        language: String,
        first: Quadrant,
        second: Quadrant,
    },
    #[error("Preset '{preset}' uses unknown language '{language}'")]
    UnknownLanguage { preset: String, language: String },
    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),
}

#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    Rank(#[from] RankError),
    #[error(transparent)]
    Preset(#[from] PresetError),
    #[error("Grid levels must be at most {max}, got {0}", max = MAX_LEVELS)]
    GridLevels(u32),
}

/// Named assignment of languages to quadrants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPreset {
    pub name: String,
    pub quadrants: BTreeMap<Quadrant, Vec<String>>,
}

impl LayoutPreset {
    /// Every language must appear in at most one quadrant
    pub fn validate(&self) -> Result<(), PresetError> {
        let mut seen: HashMap<&str, Quadrant> = HashMap::new();
        for (quadrant, language) in self.pairs() {
            if let Some(&first) = seen.get(language) {
                return Err(PresetError::DuplicateLanguage {
                    preset: self.name.clone(),
                    language: language.to_string(),
                    first,
                    second: quadrant,
                });
            }
            seen.insert(language, quadrant);
        }
        Ok(())
    }

    /// (quadrant, language) pairs in quadrant order
    pub fn pairs(&self) -> Vec<(Quadrant, &str)> {
        self.quadrants
            .iter()
            .flat_map(|(&q, langs)| langs.iter().map(move |l| (q, l.as_str())))
            .collect()
    }

    pub fn languages(&self) -> impl Iterator<Item = &String> {
        self.quadrants.values().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Canvas click: toggles label mode
    Click,
    SelectPreset(String),
    /// Toggles the backdrop dot lattice
    ToggleDots,
}

/// What the host should do after showing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawMode {
    /// Keep redrawing at the configured frame rate
    Continuous,
    /// Frame is static; redraw only on the next input event
    OnDemand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    pub redraw: RedrawMode,
}

/// Session state owned by the host
pub struct SceneState {
    width: f64,
    height: f64,
    frame_rate: u32,
    background: Rgba,
    layout: QuadrantLayout,
    grid: GridStyle,
    backdrop: Vec<DrawCommand>,
    /// Built the first time dots are shown
    dots: Option<Vec<DrawCommand>>,
    palette: Palette,
    colors: ColorRegistry,
    collators: HashMap<String, LocaleCollator>,
    presets: Vec<LayoutPreset>,
    active: usize,
    show_labels: bool,
    show_dots: bool,
    lists: HashMap<String, Vec<String>>,
}

/// Build the session state from configuration.
///
/// Fails on a malformed color, an unknown locale, an invalid preset, or too
/// many grid levels.
pub fn initialize(config: &Config) -> Result<SceneState, SceneError> {
    if !config.grid.levels_in_range() {
        return Err(SceneError::GridLevels(config.grid.levels));
    }
    let palette = build_palette(&config.palette.base_colors, config.palette.shades)?;
    let background = Rgb::from_hex(&config.background)?.opaque();
    let (width, height) = (config.canvas.width, config.canvas.height);
    let backdrop = draw_grid(width, height, &config.grid)?;

    let mut collators = HashMap::new();
    for language in &config.languages {
        collators.insert(language.code.clone(), LocaleCollator::new(&language.locale)?);
    }

    for preset in &config.presets {
        preset.validate()?;
        if let Some(language) = preset.languages().find(|l| !collators.contains_key(*l)) {
            return Err(PresetError::UnknownLanguage {
                preset: preset.name.clone(),
                language: language.clone(),
            }
            .into());
        }
    }

    let active = config
        .presets
        .iter()
        .position(|p| p.name == config.default_preset)
        .ok_or_else(|| PresetError::UnknownPreset(config.default_preset.clone()))?;

    tracing::info!(
        "Scene initialized: {}x{}, {} palette colors, preset '{}'",
        width,
        height,
        palette.len(),
        config.default_preset
    );

    Ok(SceneState {
        width,
        height,
        frame_rate: config.canvas.frame_rate,
        background,
        layout: QuadrantLayout::new(width, height, config.layout.clone()),
        grid: config.grid.clone(),
        backdrop,
        dots: None,
        palette,
        colors: ColorRegistry::new(),
        collators,
        presets: config.presets.clone(),
        active,
        show_labels: false,
        show_dots: false,
        lists: HashMap::new(),
    })
}

impl SceneState {
    /// Record resolved number lists (call once all fetches have finished)
    pub fn attach(&mut self, lists: HashMap<String, Vec<String>>) {
        tracing::debug!("Attaching {} number lists", lists.len());
        self.lists.extend(lists);
    }

    /// True once every language of the active preset has resolved
    pub fn data_loaded(&self) -> bool {
        self.preset().languages().all(|l| self.lists.contains_key(l))
    }

    pub fn preset(&self) -> &LayoutPreset {
        &self.presets[self.active]
    }

    pub fn presets(&self) -> &[LayoutPreset] {
        &self.presets
    }

    pub fn select_preset(&mut self, name: &str) -> Result<(), PresetError> {
        let index = self
            .presets
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| PresetError::UnknownPreset(name.to_string()))?;
        self.active = index;
        tracing::info!("Switched to preset '{}'", name);
        Ok(())
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn set_show_labels(&mut self, on: bool) {
        self.show_labels = on;
    }

    pub fn set_show_dots(&mut self, on: bool) {
        self.show_dots = on;
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    /// Languages drawn so far with their bound colors, in binding order
    pub fn legend(&self) -> Vec<(&str, Rgb)> {
        self.colors
            .languages()
            .iter()
            .filter_map(|l| {
                let slot = self.colors.get(l)?;
                Some((l.as_str(), self.palette.for_slot(slot)?.rgb))
            })
            .collect()
    }

    fn dots(&mut self) -> &[DrawCommand] {
        if self.dots.is_none() {
            // The grid color was already parsed in initialize
            let dots = draw_dots(self.width, self.height, &self.grid, DOT_DIAMETER)
                .unwrap_or_else(|e| {
                    tracing::warn!("Dot lattice disabled: {}", e);
                    Vec::new()
                });
            tracing::debug!("Built dot lattice: {} dots", dots.len());
            self.dots = Some(dots);
        }
        self.dots.as_deref().unwrap_or_default()
    }

    fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Click => {
                self.show_labels = !self.show_labels;
                tracing::debug!("Label mode {}", if self.show_labels { "on" } else { "off" });
            }
            InputEvent::SelectPreset(name) => {
                if let Err(e) = self.select_preset(name) {
                    tracing::warn!("{}", e);
                }
            }
            InputEvent::ToggleDots => self.show_dots = !self.show_dots,
        }
    }

    fn draw_languages(&mut self, show_labels: bool, cmds: &mut Vec<DrawCommand>) {
        let preset = &self.presets[self.active];
        for (quadrant, language) in preset.pairs() {
            let Some(collator) = self.collators.get(language) else {
                tracing::warn!("No collator for '{}', skipping", language);
                continue;
            };
            let numbers = self.lists.get(language).map(Vec::as_slice).unwrap_or(&[]);

            match self.layout.layout_quadrant(
                quadrant,
                language,
                numbers,
                collator,
                show_labels,
                &self.palette,
                &mut self.colors,
            ) {
                Ok(layout) => cmds.extend(layout),
                Err(e) => tracing::warn!("Skipping '{}' in {}: {}", language, quadrant, e),
            }
        }
    }
}

/// Produce one frame
pub fn render_frame(state: &mut SceneState, events: &[InputEvent]) -> Frame {
    for event in events {
        state.apply(event);
    }

    let mut commands = vec![DrawCommand::Background { color: state.background }];

    if !state.data_loaded() {
        return Frame {
            commands,
            redraw: RedrawMode::Continuous,
        };
    }

    commands.extend(state.backdrop.iter().cloned());
    if state.show_dots {
        commands.extend(state.dots().iter().cloned());
    }

    state.draw_languages(false, &mut commands);
    if state.show_labels {
        state.draw_languages(true, &mut commands);
    }

    Frame {
        commands,
        redraw: RedrawMode::OnDemand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn classic_lists() -> HashMap<String, Vec<String>> {
        let mut lists = HashMap::new();
        lists.insert(
            "english".to_string(),
            words(&["one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven", "twelve"]),
        );
        lists.insert(
            "spanish".to_string(),
            words(&["uno", "dos", "tres", "cuatro", "cinco", "seis", "siete", "ocho", "nueve", "diez", "once", "doce"]),
        );
        lists.insert(
            "french".to_string(),
            words(&["un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf", "dix", "onze", "douze"]),
        );
        lists.insert(
            "german".to_string(),
            words(&["eins", "zwei", "drei", "vier", "fünf", "sechs", "sieben", "acht", "neun", "zehn", "elf", "zwölf"]),
        );
        lists
    }

    fn loaded_state() -> SceneState {
        let mut state = initialize(&Config::default()).unwrap();
        state.attach(classic_lists());
        state
    }

    fn count_circles(cmds: &[DrawCommand]) -> usize {
        cmds.iter().filter(|c| matches!(c, DrawCommand::Circle { .. })).count()
    }

    fn count_texts(cmds: &[DrawCommand]) -> usize {
        cmds.iter().filter(|c| matches!(c, DrawCommand::Text { .. })).count()
    }

    #[test]
    fn test_partial_load_renders_background_only() {
        let mut state = initialize(&Config::default()).unwrap();
        let mut lists = classic_lists();
        lists.remove("german");
        state.attach(lists);

        assert!(!state.data_loaded());
        let frame = render_frame(&mut state, &[]);
        assert_eq!(frame.commands.len(), 1);
        assert!(matches!(frame.commands[0], DrawCommand::Background { .. }));
        assert_eq!(frame.redraw, RedrawMode::Continuous);
    }

    #[test]
    fn test_loaded_frame_draws_every_language() {
        let mut state = loaded_state();
        let frame = render_frame(&mut state, &[]);

        assert_eq!(frame.redraw, RedrawMode::OnDemand);
        assert_eq!(count_circles(&frame.commands), 4 * 12);
        assert_eq!(count_texts(&frame.commands), 0);
        assert_eq!(state.colors().languages(), ["english", "spanish", "french", "german"]);
    }

    #[test]
    fn test_click_adds_label_pass() {
        let mut state = loaded_state();
        let frame = render_frame(&mut state, &[InputEvent::Click]);

        assert!(state.show_labels());
        let texts = count_texts(&frame.commands);
        assert!(texts > 0);
        // Point pass plus one landmark point per label
        assert_eq!(count_circles(&frame.commands), 4 * 12 + texts);
    }

    #[test]
    fn test_toggle_twice_is_identical_to_initial_frame() {
        let mut state = loaded_state();
        let initial = render_frame(&mut state, &[]);
        let labelled = render_frame(&mut state, &[InputEvent::Click]);
        let back = render_frame(&mut state, &[InputEvent::Click]);

        assert_ne!(initial, labelled);
        assert_eq!(initial, back);
        assert_eq!(
            serde_json::to_string(&initial.commands).unwrap(),
            serde_json::to_string(&back.commands).unwrap()
        );
    }

    #[test]
    fn test_empty_language_is_skipped() {
        let mut state = initialize(&Config::default()).unwrap();
        let mut lists = classic_lists();
        lists.insert("french".to_string(), Vec::new());
        state.attach(lists);

        let frame = render_frame(&mut state, &[]);
        assert_eq!(count_circles(&frame.commands), 3 * 12);
        assert!(state.colors().get("french").is_none());
    }

    #[test]
    fn test_colors_survive_preset_switch() {
        let mut state = loaded_state();
        render_frame(&mut state, &[]);
        let english_slot = state.colors().get("english");

        let mut nordic = HashMap::new();
        for code in ["swedish", "norwegian", "danish", "finnish"] {
            nordic.insert(code.to_string(), words(&["a", "b"]));
        }
        state.attach(nordic);
        render_frame(&mut state, &[InputEvent::SelectPreset("nordic".to_string())]);
        render_frame(&mut state, &[InputEvent::SelectPreset("classic".to_string())]);

        assert_eq!(state.colors().get("english"), english_slot);
        assert_eq!(state.colors().get("swedish"), Some(4));
    }

    #[test]
    fn test_legend_follows_binding_order() {
        let mut state = loaded_state();
        assert!(state.legend().is_empty());
        render_frame(&mut state, &[]);

        let legend = state.legend();
        let names: Vec<&str> = legend.iter().map(|(l, _)| *l).collect();
        assert_eq!(names, vec!["english", "spanish", "french", "german"]);
        assert_eq!(legend[0].1, Rgb::from_hex("#e6194b").unwrap());
    }

    #[test]
    fn test_unknown_preset_event_is_ignored() {
        let mut state = loaded_state();
        render_frame(&mut state, &[InputEvent::SelectPreset("atlantis".to_string())]);
        assert_eq!(state.preset().name, "classic");
    }

    #[test]
    fn test_dots_toggle() {
        let mut state = loaded_state();
        let plain = count_circles(&render_frame(&mut state, &[]).commands);
        let dotted = count_circles(&render_frame(&mut state, &[InputEvent::ToggleDots]).commands);
        assert_eq!(dotted, plain + 49);
    }

    #[test]
    fn test_dots_built_only_once_shown() {
        let mut state = loaded_state();
        render_frame(&mut state, &[]);
        assert!(state.dots.is_none());
        render_frame(&mut state, &[InputEvent::ToggleDots]);
        assert_eq!(state.dots.as_ref().map(Vec::len), Some(49));
    }

    #[test]
    fn test_too_many_grid_levels_fail_startup() {
        let mut config = Config::default();
        config.grid.levels = 64;
        assert!(matches!(initialize(&config), Err(SceneError::GridLevels(64))));

        config.grid.levels = MAX_LEVELS;
        assert!(initialize(&config).is_ok());
    }

    #[test]
    fn test_duplicate_language_preset_is_rejected() {
        let mut config = Config::default();
        config.presets[0].quadrants.get_mut(&Quadrant::Four).unwrap().push("english".to_string());
        match initialize(&config) {
            Err(SceneError::Preset(PresetError::DuplicateLanguage { language, first, second, .. })) => {
                assert_eq!(language, "english");
                assert_eq!((first, second), (Quadrant::One, Quadrant::Four));
            }
            _ => panic!("expected duplicate language error"),
        }
    }

    #[test]
    fn test_malformed_palette_color_fails_startup() {
        let mut config = Config::default();
        config.palette.base_colors.push("#zzz".to_string());
        assert!(matches!(initialize(&config), Err(SceneError::Color(_))));
    }

    #[test]
    fn test_unknown_default_preset() {
        let config = Config {
            default_preset: "custom".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            initialize(&config),
            Err(SceneError::Preset(PresetError::UnknownPreset(_)))
        ));
    }
}
