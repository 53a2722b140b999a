use crate::domain::partners::ui::list::PartnersList;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <PartnersList />
    }
}
