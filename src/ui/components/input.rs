use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::{
    AppState, Component, FieldPath, FieldTarget, INGREDIENT_A_NAME, INGREDIENT_B_NAME,
};

/// One editable avg-price box in the inputs panel.
#[derive(Clone, Debug, PartialEq)]
pub struct InputField {
    pub label: String,
    pub path: FieldPath,
    pub text: String,
}

/// What a key press in the panel asks the caller to do.
#[derive(Clone, Debug, PartialEq)]
pub enum InputAction {
    None,
    /// Apply `text` to `field` (canonical path string).
    Submit { field: String, text: String },
}

#[derive(Clone, Debug)]
pub struct InputPanel {
    fields: Vec<InputField>,
    focus: usize,
}

impl InputPanel {
    pub fn new(state: &AppState) -> Self {
        let mut targets = vec![
            (INGREDIENT_A_NAME.to_string(), FieldTarget::IngredientA),
            (INGREDIENT_B_NAME.to_string(), FieldTarget::IngredientB),
        ];
        targets.extend(
            state
                .snapshot
                .items
                .iter()
                .enumerate()
                .map(|(slot, item)| (item.name.clone(), FieldTarget::Item(slot))),
        );

        let fields = targets
            .into_iter()
            .map(|(name, target)| InputField {
                label: format!("{name} avg"),
                path: FieldPath::new(target, Some(Component::Avg)),
                text: String::new(),
            })
            .collect();

        let mut panel = Self { fields, focus: 0 };
        panel.sync(state);
        panel
    }

    /// Resets every box to the current avg value, dropping unsubmitted text.
    pub fn sync(&mut self, state: &AppState) {
        for field in &mut self.fields {
            let value = match field.path.target {
                FieldTarget::IngredientA => Some(state.snapshot.ingredient_a.avg),
                FieldTarget::IngredientB => Some(state.snapshot.ingredient_b.avg),
                FieldTarget::Item(slot) => state.snapshot.items.get(slot).map(|item| item.price.avg),
            };
            field.text = value.map(|v| v.to_string()).unwrap_or_default();
        }
    }

    pub fn fields(&self) -> &[InputField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter => {
                if let Some(field) = self.fields.get(self.focus) {
                    return InputAction::Submit {
                        field: field.path.to_string(),
                        text: field.text.clone(),
                    };
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.text.pop();
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.text.clear();
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.text.push(ch);
                }
            }
            _ => {}
        }
        InputAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceTriple;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn shows_avg_values_and_submits_focused_field() {
        let mut state = AppState::default();
        state.snapshot.items[0].price = PriceTriple::flat(1_500);
        let mut panel = InputPanel::new(&state);
        assert_eq!(panel.fields().len(), 5);

        panel.handle_key(key(KeyCode::Down));
        panel.handle_key(key(KeyCode::Down));
        assert_eq!(panel.fields()[2].text, "1500");

        panel.handle_key(key(KeyCode::Backspace));
        panel.handle_key(key(KeyCode::Char('k')));
        assert_eq!(
            panel.handle_key(key(KeyCode::Enter)),
            InputAction::Submit {
                field: "item1.avg".to_string(),
                text: "150k".to_string()
            }
        );
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut panel = InputPanel::new(&AppState::default());
        panel.focus_prev();
        assert_eq!(panel.focus(), 4);
        panel.focus_next();
        assert_eq!(panel.focus(), 0);
    }
}
