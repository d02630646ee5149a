//! The seed dataset.
//!
//! Used as the in-memory fallback when nothing is cached, as the target of a
//! local reset, and as the one-time seed written to an empty remote store.

use crate::models::{AboutConfig, BusinessConfig, Category, ImagesConfig, Product, SocialConfig};
use crate::types::{CategoryId, ImageRef, Price, ProductId};

const UNSPLASH: &str = "https://images.unsplash.com/";

fn category(id: &str, name: &str, icon: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_owned(),
        icon: icon.to_owned(),
    }
}

fn product(
    id: &str,
    name: &str,
    price: u32,
    description: &str,
    photo: &str,
    category: &str,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: Price::whole(price),
        description: description.to_owned(),
        image: ImageRef::new(format!("{UNSPLASH}{photo}")),
        category: CategoryId::new(category),
        available: true,
    }
}

/// Default menu categories.
#[must_use]
pub fn categories() -> Vec<Category> {
    vec![
        category("desayunos", "Desayunos", "☀️"),
        category("recargar-energia", "Para recargar energía", "⚡"),
        category("saludable", "Zona Saludable", "🍏"),
        category("golosos", "Para los más golosos", "🍬"),
        category("bebidas-frias", "Bebidas Frías", "🧊"),
        category("bebidas-calientes", "Bebidas Calientes", "☕"),
        category("cafes-frios", "Cafés Fríos", "🌀"),
        category("cafes-calientes", "Cafés Calientes", "🫖"),
        category("bebidas-adicionales", "Bebidas Adicionales", "🥤"),
        category("especial", "Especial", "👑"),
        category("tortas", "Tortas", "🎂"),
        category("otros", "Otros", "📦"),
    ]
}

/// Default menu products.
#[must_use]
pub fn products() -> Vec<Product> {
    vec![
        product("1", "Huevos Revueltos", 85, "Huevos revueltos con tocino y pan tostado", "photo-1525351484163-7529414344d8?w=400", "desayunos"),
        product("2", "Hot Cakes", 95, "3 hot cakes con miel y mantequilla", "photo-1567620905732-2d1ec7ab7445?w=400", "desayunos"),
        product("3", "Chilaquiles", 110, "Chilaquiles verdes con pollo y crema", "photo-1599974579688-8dbdd335c77f?w=400", "desayunos"),
        product("4", "Avena con Frutas", 75, "Avena cocida con frutas frescas", "photo-1517673400267-0251440c45dc?w=400", "desayunos"),
        product("1b", "Sándwich de Huevo", 90, "Sándwich con huevo, jamón y queso", "photo-1528735602780-2552fd46c7af?w=400", "desayunos"),
        product("1c", "Omelette", 100, "Omelette con vegetales y queso", "photo-1510693206972-df098062cb71?w=400", "desayunos"),
        product("re1", "Batido Energético", 85, "Batido de plátano, avena y miel", "photo-1553530666-ba11a7da3888?w=400", "recargar-energia"),
        product("re2", "Granola con Yogurt", 75, "Granola casera con yogurt griego", "photo-1488477181946-6428a0291777?w=400", "recargar-energia"),
        product("re3", "Barra de Proteína", 45, "Barra energética casera", "photo-1622484212850-eb596d769edc?w=400", "recargar-energia"),
        product("re4", "Bowl de Açaí", 120, "Bowl de açaí con granola y frutas", "photo-1590301157890-4810ed352733?w=400", "recargar-energia"),
        product("re5", "Smoothie Verde", 80, "Espinaca, plátano y leche de almendras", "photo-1610970881699-44a5587cabec?w=400", "recargar-energia"),
        product("re6", "Tostadas con Aguacate", 95, "Tostadas con aguacate y huevo pochado", "photo-1541519227354-08fa5d50c44d?w=400", "recargar-energia"),
        product("go1", "Brownie con Helado", 85, "Brownie tibio con helado de vainilla", "photo-1606313564200-e75d5e30476c?w=400", "golosos"),
        product("go2", "Cheesecake", 75, "Cheesecake con frutos rojos", "photo-1565958011703-44f9829ba187?w=400", "golosos"),
        product("go3", "Muffin de Chocolate", 50, "Muffin tibio con chips de chocolate", "photo-1607958996333-41aef7caefaa?w=400", "golosos"),
        product("go4", "Dona Glaseada", 35, "Dona fresca con glaseado", "photo-1551024601-bec78aea704b?w=400", "golosos"),
        product("go5", "Cookie Gigante", 55, "Cookie tibia con chips de chocolate", "photo-1499636136210-6f4ee915583e?w=400", "golosos"),
        product("ba1", "Agua Mineral", 30, "Agua mineral con gas", "photo-1548839140-29a749e1cf4d?w=400", "bebidas-adicionales"),
        product("ba2", "Jugo Natural", 45, "Jugo de naranja, piña o zanahoria", "photo-1600271886742-f049cd451bba?w=400", "bebidas-adicionales"),
        product("ba3", "Limonada", 40, "Limonada fresca con menta", "photo-1621263764928-df1444c5e859?w=400", "bebidas-adicionales"),
        product("ba4", "Té Helado", 45, "Té negro con limón y hielo", "photo-1556679343-c7306c1976bc?w=400", "bebidas-adicionales"),
        product("ba5", "Refresco", 35, "Coca-Cola, Sprite o Fanta", "photo-1581636625402-29b2a704ef13?w=400", "bebidas-adicionales"),
        product("5", "Ensalada de Frutas", 65, "Mix de frutas frescas de temporada", "photo-1490474418585-ba9bad8fd0ea?w=400", "saludable"),
        product("6", "Yogurt Parfait", 80, "Yogurt con granola y miel", "photo-1488477181946-6428a0291777?w=400", "saludable"),
        product("7", "Bowl de Acai", 120, "Bowl de acai con frutas y granola", "photo-1590301157890-4810ed352733?w=400", "saludable"),
        product("8", "Smoothie Verde", 75, "Espinaca, plátano y leche de almendras", "photo-1610970881699-44a5587cabec?w=400", "saludable"),
        product("9", "Limonada Natural", 45, "Limonada fresca con menta", "photo-1621263764928-df1444c5e859?w=400", "bebidas-frias"),
        product("10", "Jugo de Naranja", 50, "Jugo natural de naranja", "photo-1600271886742-f049cd451bba?w=400", "bebidas-frias"),
        product("11", "Agua de Coco", 55, "Agua de coco natural", "photo-1525385133512-2f3bdd039054?w=400", "bebidas-frias"),
        product("12", "Milkshake de Chocolate", 75, "Milkshake espeso de chocolate", "photo-1572490122747-3968b75cc699?w=400", "bebidas-frias"),
        product("13", "Chocolate Caliente", 55, "Chocolate caliente con leche", "photo-1542990253-0d0f5be5f0ed?w=400", "bebidas-calientes"),
        product("14", "Té de Hierbas", 40, "Selección de tés relajantes", "photo-1556679343-c7306c1976bc?w=400", "bebidas-calientes"),
        product("15", "Leche con Miel", 45, "Leche tibia con miel y canela", "photo-1558618666-fcd25c85cd64?w=400", "bebidas-calientes"),
        product("16", "Iced Coffee", 60, "Café frío con hielo y leche", "photo-1517701550927-30cf4ba1dba5?w=400", "cafes-frios"),
        product("17", "Cold Brew", 70, "Café cold brew artesanal", "photo-1461023058943-07fcbe16d735?w=400", "cafes-frios"),
        product("18", "Frappuccino", 80, "Bebida helada con café y crema", "photo-1585494156145-1c60a4fe952b?w=400", "cafes-frios"),
        product("19", "Café Negro", 35, "Café negro tradicional", "photo-1509042239860-f550ce710b93?w=400", "cafes-calientes"),
        product("20", "Café con Leche", 45, "Café con leche caliente", "photo-1572442388796-11668a67e53d?w=400", "cafes-calientes"),
        product("21", "Capuccino", 55, "Café con espuma de leche", "photo-1572442388796-11668a67e53d?w=400", "cafes-calientes"),
        product("22", "Latte", 60, "Café latte con latte art", "photo-1570968915860-54d5c301fa9f?w=400", "cafes-calientes"),
        product("23", "Moccachino", 65, "Café con chocolate y crema", "photo-1578314675249-a6910f80cc4e?w=400", "cafes-calientes"),
        product("24", "Café Irlandés", 95, "Café con whiskey y crema", "photo-1545438102-799c3991ffb2?w=400", "especial"),
        product("25", "Mocha Especial", 80, "Café con chocolate y crema batida", "photo-1578314675249-a6910f80cc4e?w=400", "especial"),
        product("26", "Matcha Latte", 85, "Té matcha con leche", "photo-1536256263959-770b48d82b0a?w=400", "especial"),
        product("31", "Torta de Chocolate", 120, "Torta de chocolate con cobertura", "photo-1578985545062-69928b1d9587?w=400", "tortas"),
        product("32", "Torta de Vainilla", 110, "Torta de vainilla con crema", "photo-1535141192574-5d4897c12636?w=400", "tortas"),
        product("33", "Torta de Zanahoria", 115, "Torta de zanahoria con nueces", "photo-1621303837174-89787a7d4729?w=400", "tortas"),
        product("34", "Torta de Tres Leches", 130, "Torta tradicional de tres leches", "photo-1464349095431-e9a21285b5f3?w=400", "tortas"),
        product("27", "Croissant", 45, "Croissant recién horneado", "photo-1555507036-ab1f4038808a?w=400", "otros"),
        product("28", "Muffin", 40, "Muffin de chocolate o vainilla", "photo-1607958996333-41aef7caefaa?w=400", "otros"),
        product("29", "Galletas", 25, "Galletas caseras", "photo-1499636136210-6f4ee915583e?w=400", "otros"),
        product("30", "Brownie", 50, "Brownie con chocolate", "photo-1606313564200-e75d5e30476c?w=400", "otros"),
    ]
}

/// Default business details.
#[must_use]
pub fn business_config() -> BusinessConfig {
    BusinessConfig {
        name: "Dulsan Cafetería".to_owned(),
        slogan: "Sabores que te conquistan".to_owned(),
        phone: "+52 555 123 4567".to_owned(),
        address: "Av. Principal 123, Col. Centro".to_owned(),
        schedule: "Lunes a Domingo: 7:00 AM - 10:00 PM".to_owned(),
        admin_password: "admin123".to_owned(),
        primary_color: "#a87880".to_owned(),
        secondary_color: "#5a949f".to_owned(),
    }
}

/// Default "about us" section.
#[must_use]
pub fn about_config() -> AboutConfig {
    AboutConfig {
        title: "Sobre Nosotros".to_owned(),
        text: "En Dulsan Cafetería creemos que cada taza de café cuenta una historia. \
               Desde 2015 brindamos los mejores momentos de café a nuestra comunidad, \
               con ingredientes frescos y un ambiente acogedor. Nuestro compromiso es \
               ofrecerte no solo una bebida, sino una experiencia inolvidable."
            .to_owned(),
    }
}

/// Default social links.
#[must_use]
pub fn social_config() -> SocialConfig {
    SocialConfig {
        facebook: "https://facebook.com/dulsan".to_owned(),
        instagram: "https://instagram.com/dulsan".to_owned(),
        whatsapp: "https://wa.me/525551234567".to_owned(),
        tiktok: "https://tiktok.com/@dulsan".to_owned(),
    }
}

/// Default site images.
#[must_use]
pub fn images_config() -> ImagesConfig {
    ImagesConfig {
        logo_url: ImageRef::new(format!("{UNSPLASH}photo-1495474472287-4d71bcdd2085?w=200")),
        hero_image: ImageRef::new(format!("{UNSPLASH}photo-1501339847302-ac426a4a7cbb?w=800")),
        about_us_image: ImageRef::new(format!(
            "{UNSPLASH}photo-1554118811-1e0d58224f24?w=600"
        )),
    }
}
