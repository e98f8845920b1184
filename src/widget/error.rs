/// Client-side precondition failures. Each blocks the action it guards and
/// is shown to the user as-is; none of them reach the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("Please enter at least one medication.")]
    EmptySelection,

    #[error("Please select at least {required} medications to check interactions.")]
    NotEnoughMedications { required: usize, selected: usize },

    #[error("Please choose a medication from the suggestions.")]
    UnknownMedication(String),
}
