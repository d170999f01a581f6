//! The bubble field: token storage, simulation loop, pointer interaction,
//! and the selection contract exposed to callers.

use crate::config::{FieldConfig, SelectionMode};
use crate::error::FieldError;
use crate::input::{PointerEvent, PointerState};
use crate::layout;
use crate::physics;
use crate::selection::SelectionMap;
use crate::token::{ItemSpec, SelectionLevel, Token};
use kurbo::{Point, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::fmt;

/// Numerator of the background-click scatter impulse: magnitude is
/// `10 / (distance + 1)` directed away from the pointer.
const SCATTER_STRENGTH: f64 = 10.0;

type SelectionHandler = Box<dyn FnMut(&SelectionMap)>;

/// A field of draggable, mutually-repelling circular tokens.
///
/// The field owns its tokens and pointer state and is driven from outside:
/// the host calls [`BubbleField::tick`] once per frame and feeds pointer or
/// touch events through [`BubbleField::handle_pointer_event`]. Selection
/// changes reach the caller through [`BubbleField::on_selection_changed`]
/// subscribers and the [`BubbleField::selections`] accessor. Instances are
/// plain values owned by the caller.
pub struct BubbleField {
    tokens: Vec<Token>,
    /// Token id → index into `tokens`. Insertion order is `tokens` order.
    index: HashMap<String, usize>,
    config: FieldConfig,
    pointer: PointerState,
    rng: StdRng,
    subscribers: Vec<SelectionHandler>,
}

impl fmt::Debug for BubbleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BubbleField")
            .field("tokens", &self.tokens)
            .field("config", &self.config)
            .field("pointer", &self.pointer)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl BubbleField {
    /// Build a field from caller items and configuration.
    ///
    /// Malformed configuration is repaired to defaults; an empty item list
    /// yields a valid zero-token field. Only structural item problems fail:
    /// empty or duplicate ids.
    pub fn new(items: &[ItemSpec], config: FieldConfig) -> Result<Self, FieldError> {
        let config = config.sanitized();
        let radius = layout::token_radius(&config, items.len());

        let mut tokens = Vec::with_capacity(items.len());
        let mut index = HashMap::with_capacity(items.len());
        for item in items {
            if item.id.is_empty() {
                return Err(FieldError::EmptyId);
            }
            if index.contains_key(&item.id) {
                return Err(FieldError::DuplicateId(item.id.clone()));
            }
            index.insert(item.id.clone(), tokens.len());
            tokens.push(Token::from_spec(item, radius));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        layout::place_tokens(&mut tokens, &config, &mut rng);

        log::debug!(
            "field created: {} tokens, {}x{} surface",
            tokens.len(),
            config.width,
            config.height
        );

        Ok(Self {
            tokens,
            index,
            config,
            pointer: PointerState::default(),
            rng,
            subscribers: Vec::new(),
        })
    }

    /// Run one simulation step: free motion for every non-dragged token,
    /// then pairwise collision resolution. The dragged token only tracks
    /// the pointer.
    pub fn tick(&mut self) {
        if self.tokens.is_empty() {
            return;
        }
        physics::free_motion_pass(&mut self.tokens, self.pointer.dragged, &self.config);
        physics::collision_pass(
            &mut self.tokens,
            self.pointer.dragged,
            &self.config,
            &mut self.rng,
        );
    }

    /// Feed one pointer (or translated touch) event into the field.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        let Some(position) = self.clamp_to_surface(event.position()) else {
            log::warn!("ignoring pointer event with non-finite position");
            return;
        };
        self.pointer.position = position;

        match event {
            PointerEvent::Move { .. } => {
                match self.pointer.dragged {
                    Some(idx) if idx < self.tokens.len() => {
                        let token = &mut self.tokens[idx];
                        token.position = position;
                        token.velocity = Vec2::ZERO;
                    }
                    Some(_) => {
                        // Drag target vanished: clear and fall back to hover.
                        self.pointer.clear_drag();
                        self.update_hover(position);
                    }
                    None => self.update_hover(position),
                }
            }
            PointerEvent::Down { .. } => {
                self.pointer.pressed = true;
                match self.hit_test(position) {
                    Some(idx) => {
                        self.toggle(idx);
                        self.pointer.dragged = Some(idx);
                    }
                    None => self.scatter_from(position),
                }
            }
            PointerEvent::Up { .. } => {
                self.pointer.pressed = false;
                self.pointer.clear_drag();
                self.update_hover(position);
            }
        }
    }

    /// Subscribe to selection changes. The handler is invoked synchronously
    /// with the full mapping after every pointer-driven toggle.
    pub fn on_selection_changed(&mut self, handler: impl FnMut(&SelectionMap) + 'static) {
        self.subscribers.push(Box::new(handler));
    }

    /// Current contribution mapping. Unselected tokens are absent.
    pub fn selections(&self) -> SelectionMap {
        self.tokens
            .iter()
            .filter_map(|t| {
                t.contribution(self.config.selection_mode, self.config.scaling)
                    .map(|value| (t.id.clone(), value))
            })
            .collect()
    }

    /// Replace the selection state from a caller-supplied mapping.
    ///
    /// All tokens are first reset; ids absent from the mapping stay
    /// unselected. Unknown ids and non-finite or negative values are
    /// skipped with a log entry. Feeding back the output of
    /// [`Self::selections`] reproduces the same state.
    ///
    /// This is caller-initiated state, not a toggle, so subscribers are not
    /// notified.
    pub fn update_selections(&mut self, map: &SelectionMap) {
        for token in &mut self.tokens {
            token.deselect();
        }

        for (id, &value) in map {
            if !value.is_finite() || value < 0.0 {
                log::warn!("ignoring selection entry '{id}' with invalid value {value}");
                continue;
            }
            let Some(&idx) = self.index.get(id) else {
                log::warn!("ignoring selection entry for unknown id '{id}'");
                continue;
            };
            match self.config.selection_mode {
                SelectionMode::Single => {
                    // Exclusivity: the last valid entry in map order wins.
                    for token in &mut self.tokens {
                        token.deselect();
                    }
                    self.tokens[idx].select_at(SelectionLevel::Full);
                }
                SelectionMode::Multiple => {
                    let level = self.tokens[idx].level_for_contribution(value, self.config.scaling);
                    self.tokens[idx].select_at(level);
                }
            }
        }
    }

    /// Rescale the field to a new surface size, preserving selections.
    ///
    /// Positions scale proportionally, radii are re-derived with the same
    /// count-based taper, and the selection mapping is captured before and
    /// reapplied after.
    pub fn resize(&mut self, new_width: f64, new_height: f64) {
        let mut next = self.config.clone();
        next.width = new_width;
        next.height = new_height;
        let next = next.sanitized();

        let scale_x = next.width / self.config.width;
        let scale_y = next.height / self.config.height;
        let saved = self.selections();

        self.config = next;
        let radius = layout::token_radius(&self.config, self.tokens.len());
        for token in &mut self.tokens {
            token.position = Point::new(token.position.x * scale_x, token.position.y * scale_y);
            token.radius = radius;
        }

        self.update_selections(&saved);
    }

    /// Tokens in insertion order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Look up a token by id.
    pub fn token(&self, id: &str) -> Option<&Token> {
        self.index.get(id).map(|&idx| &self.tokens[idx])
    }

    /// The active (sanitized) configuration.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Id of the token under the pointer, if any.
    pub fn hovered_id(&self) -> Option<&str> {
        self.pointer.hovered.map(|idx| self.tokens[idx].id.as_str())
    }

    /// Id of the token being dragged, if any.
    pub fn dragged_id(&self) -> Option<&str> {
        self.pointer.dragged.map(|idx| self.tokens[idx].id.as_str())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Apply the toggle rule to a hit token and notify subscribers.
    fn toggle(&mut self, idx: usize) {
        match self.config.selection_mode {
            SelectionMode::Single => {
                // A hit always means "select this one"; re-clicking the sole
                // selection never deselects it.
                for token in &mut self.tokens {
                    token.deselect();
                }
                self.tokens[idx].select_at(SelectionLevel::Full);
            }
            SelectionMode::Multiple => {
                let token = &mut self.tokens[idx];
                let next = token.level.next();
                token.select_at(next);
            }
        }

        let map = self.selections();
        log::debug!("selection changed: {} entries", map.len());
        for handler in &mut self.subscribers {
            handler(&map);
        }
    }

    /// First token in insertion order containing the point.
    fn hit_test(&self, position: Point) -> Option<usize> {
        self.tokens.iter().position(|t| t.hit_test(position))
    }

    /// Update hover flags against the current pointer position.
    fn update_hover(&mut self, position: Point) {
        let hovered = self.hit_test(position);
        for (i, token) in self.tokens.iter_mut().enumerate() {
            token.hovered = hovered == Some(i);
        }
        self.pointer.hovered = hovered;
    }

    /// Push every token away from a background click, with strength
    /// falling off with distance.
    fn scatter_from(&mut self, position: Point) {
        for token in &mut self.tokens {
            let away = token.position - position;
            let distance = away.hypot();
            let magnitude = SCATTER_STRENGTH / (distance + 1.0);
            let direction = if distance < 1e-9 {
                let angle = self.rng.gen_range(0.0..TAU);
                Vec2::new(angle.cos(), angle.sin())
            } else {
                away * (1.0 / distance)
            };
            token.velocity += direction * magnitude;
        }
    }

    /// Clamp a pointer position into the surface, rejecting non-finite
    /// coordinates entirely.
    fn clamp_to_surface(&self, position: Point) -> Option<Point> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return None;
        }
        Some(Point::new(
            position.x.clamp(0.0, self.config.width),
            position.y.clamp(0.0, self.config.height),
        ))
    }
}
