pub mod info_card;
pub mod map_view;
