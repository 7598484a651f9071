use payloads::responses::TimeSlot;
use yew::prelude::*;

use crate::utils::time::format_time;

#[derive(Properties, PartialEq)]
pub struct SlotPickerProps {
    pub slots: Vec<TimeSlot>,
    pub selected: Option<TimeSlot>,
    pub on_select: Callback<TimeSlot>,
}

/// Grid of the day's slots. Taken slots are shown but cannot be picked.
#[function_component]
pub fn SlotPicker(props: &SlotPickerProps) -> Html {
    if props.slots.iter().all(|slot| !slot.available) {
        return html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {"No free slots on this day. Please choose another date."}
            </p>
        };
    }

    html! {
        <div class="grid grid-cols-3 sm:grid-cols-4 gap-2">
            {for props.slots.iter().map(|slot| {
                let is_selected = props.selected.as_ref() == Some(slot);
                let onclick = {
                    let slot = slot.clone();
                    let on_select = props.on_select.clone();
                    Callback::from(move |_: MouseEvent| on_select.emit(slot.clone()))
                };
                let class = if is_selected {
                    "bg-neutral-900 text-white dark:bg-neutral-100 dark:text-neutral-900"
                } else if slot.available {
                    "bg-white dark:bg-neutral-800 hover:bg-neutral-100 dark:hover:bg-neutral-700"
                } else {
                    "bg-neutral-100 dark:bg-neutral-900 text-neutral-400 line-through cursor-not-allowed"
                };
                html! {
                    <button
                        type="button"
                        disabled={!slot.available}
                        {onclick}
                        class={classes!("px-3", "py-2", "rounded-md", "border", "border-neutral-300", "dark:border-neutral-600", "text-sm", class)}
                    >
                        {format_time(slot.start_time)}
                    </button>
                }
            })}
        </div>
    }
}
