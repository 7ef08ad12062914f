//! Built-in sample catalog for `--demo`

use pantry_core::{CatalogItem, CatalogKind};

const FOODS: &[(&str, &str, &str, f64)] = &[
    ("Chicken Wrap", "Wraps", "Grilled chicken, lettuce and garlic sauce", 8.5),
    ("Veggie Wrap", "Wraps", "Roasted vegetables with hummus", 7.5),
    ("Falafel Wrap", "Wraps", "Falafel, pickles and tahini", 7.0),
    ("Chicken Soup", "Soups", "Slow-cooked broth with noodles", 5.5),
    ("Lentil Soup", "Soups", "Red lentils, cumin and lemon", 5.0),
    ("Tomato Soup", "Soups", "Served with a cheese toastie", 5.0),
    ("Caesar Salad", "Salads", "Romaine, croutons and parmesan", 7.0),
    ("Greek Salad", "Salads", "Feta, olives and cucumber", 7.0),
    ("Cheese Burger", "Burgers", "Beef patty with cheddar", 9.5),
    ("Mushroom Burger", "Burgers", "Portobello with swiss cheese", 9.0),
    ("Fish and Chips", "Mains", "Battered cod with fries", 11.0),
    ("Lasagne", "Mains", "Beef ragu baked with bechamel", 10.5),
    ("Chocolate Brownie", "Desserts", "Served warm", 4.0),
    ("Cheesecake", "Desserts", "Baked vanilla cheesecake", 4.5),
];

const DRINKS: &[(&str, &str, &str, f64)] = &[
    ("Iced Tea", "Tea", "Peach black tea over ice", 3.0),
    ("Chai Latte", "Tea", "Spiced tea with steamed milk", 3.5),
    ("Green Tea", "Tea", "Sencha, served hot", 2.5),
    ("Espresso", "Coffee", "Double shot", 2.5),
    ("Flat White", "Coffee", "Espresso with microfoam", 3.2),
    ("Cold Brew", "Coffee", "Steeped for 18 hours", 3.8),
    ("Lemonade", "Soft Drinks", "Freshly squeezed", 3.0),
    ("Cola", "Soft Drinks", "Chilled can", 2.0),
    ("Orange Juice", "Juices", "Freshly pressed", 3.5),
    ("Chocolate Shake", "Shakes", "Whole milk and cocoa", 4.5),
];

/// Sample items for a catalog kind, with ids in listing order
pub fn items(kind: CatalogKind) -> Vec<CatalogItem> {
    let rows = match kind {
        CatalogKind::Food => FOODS,
        CatalogKind::Drink => DRINKS,
    };
    rows.iter()
        .enumerate()
        .map(|(i, (name, category, description, price))| {
            CatalogItem::new(i as u64 + 1, *name)
                .with_category(*category)
                .with_description(*description)
                .with_price(*price)
                .with_quantity(10 + (i as u32 * 7) % 25)
        })
        .collect()
}
