//! The generated product catalog seeded into a fresh store.

use rand::Rng;

use crate::product::Product;

pub const CATEGORIES: [&str; 5] = ["Electronics", "Fashion", "Home", "Food", "Books"];

const ELECTRONICS: [&str; 20] = [
    "Bluetooth Headphones", "Wireless Mouse", "Mechanical Keyboard", "Mini Speaker", "USB Drive 32GB",
    "Power Bank", "LED Desk Lamp", "USB-C Hub", "HD Webcam", "Phone Case",
    "Fast Charging Cable", "Phone Stand", "Clip-on Monitor Light", "USB Fan", "Smartwatch",
    "Gaming Headset", "Wi-Fi Router", "Portable Hard Drive", "Memory Card 64GB", "VR Headset",
];

const FASHION: [&str; 20] = [
    "Men's T-Shirt", "Women's Blouse", "Jeans", "Dress", "Handbag",
    "Sneakers", "Baseball Cap", "Sunglasses", "Wristwatch", "Leather Belt",
    "Jacket", "Shorts", "Sandals", "Fashion Backpack", "Scarf",
    "Bracelet", "Necklace", "Earrings", "Silver Ring", "Leather Wallet",
];

const HOME: [&str; 20] = [
    "Rice Cooker", "Electric Kettle", "Blender", "Thermos Bottle", "Food Container",
    "Kitchen Knife", "Non-stick Pan", "Glass Set", "Wooden Cutting Board", "Spice Rack",
    "Juicer", "Air Fryer", "Mini Microwave", "Coffee Maker", "Stainless Pot Set",
    "Plastic Basket", "Storage Tray", "Night Light", "Electric Fan", "Mini Vacuum",
];

const FOOD: [&str; 20] = [
    "Coffee Beans", "Green Tea", "Pure Honey", "Roasted Cashews", "Butter Cookies",
    "Dark Chocolate", "Fish Sauce", "Olive Oil", "ST25 Rice", "Spaghetti",
    "Chili Sauce", "Rock Sugar", "Seasoning", "Black Pepper", "Pink Salt",
    "Breakfast Cereal", "Nut Milk", "Coconut Water", "Milk Tea", "Rice Paper",
];

const BOOKS: [&str; 20] = [
    "How to Win Friends", "The Alchemist", "Thinking, Fast and Slow", "Sapiens", "Atomic Habits",
    "Rich Dad Poor Dad", "The 7 Habits", "Deep Work", "Mindset", "Start With Why",
    "Lean Startup", "Zero to One", "Good to Great", "The One Thing", "Essentialism",
    "Think Again", "The Psychology of Money", "Outliers", "Blink", "Drive",
];

pub const MIN_PRICE: u64 = 50_000;
pub const MAX_PRICE: u64 = 950_000;

fn names_for(category: &str) -> &'static [&'static str] {
    match category {
        "Electronics" => &ELECTRONICS,
        "Fashion" => &FASHION,
        "Home" => &HOME,
        "Food" => &FOOD,
        "Books" => &BOOKS,
        _ => &[],
    }
}

/// Generate the catalog: ids `product-1..=product-100` in category order,
/// prices drawn from `[MIN_PRICE, MAX_PRICE)`.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Vec<Product> {
    let mut products = Vec::new();
    let mut n = 1u32;
    for category in CATEGORIES {
        for name in names_for(category) {
            products.push(Product {
                id: format!("product-{n}"),
                name: (*name).to_string(),
                price: rng.gen_range(MIN_PRICE..MAX_PRICE),
                image: format!("https://picsum.photos/seed/{n}/300/300"),
                description: format!("{name}, high quality at the best price."),
                category: category.to_string(),
            });
            n += 1;
        }
    }
    products
}

pub fn generate_default() -> Vec<Product> {
    generate(&mut rand::thread_rng())
}
