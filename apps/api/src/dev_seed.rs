//! Idempotent development data: the fixed catalog, three accounts and a
//! menu of demo dishes.

use std::collections::HashMap;

use dishpicker_application::{
    CatalogRepository, DishRepository, NewDish, NewUser, PasswordHasher, UserRepository,
};
use dishpicker_core::AppResult;
use dishpicker_domain::{DishName, DishTypeId, EmailAddress, LabelId, Role, User, Username};
use dishpicker_infrastructure::{
    Argon2PasswordHasher, PostgresCatalogRepository, PostgresDishRepository,
    PostgresUserRepository,
};
use sqlx::PgPool;
use tracing::info;

const SEED_LABELS: [&str; 5] = ["No Dairy", "No Eggs", "No Fish", "No Gluten", "No Meat"];
const SEED_DISH_TYPES: [&str; 4] = ["Breakfast", "Lunch", "Dinner", "Dessert"];

struct SeedUser {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    image_path: &'static str,
}

const SEED_USERS: [SeedUser; 3] = [
    SeedUser {
        username: "admin",
        email: "admin@admin.de",
        password: "Admin#2024",
        role: Role::Admin,
        image_path: "public/img/users/sample_avatar.jpg",
    },
    SeedUser {
        username: "user",
        email: "user@user.de",
        password: "User#2024",
        role: Role::User,
        image_path: "public/img/users/sample_avatar2.jpg",
    },
    SeedUser {
        username: "Emma",
        email: "emma@web.de",
        password: "Emma#2024",
        role: Role::User,
        image_path: "public/img/users/sample_avatar3.jpg",
    },
];

struct SeedDish {
    name: &'static str,
    image: &'static str,
    labels: &'static [&'static str],
    dish_types: &'static [&'static str],
}

const SEED_DISHES: &[SeedDish] = &[
    SeedDish {
        name: "Spaghetti Bolognese",
        image: "spaghetti_bolognese.jpg",
        labels: &["No Fish"],
        dish_types: &["Lunch", "Dinner"],
    },
    SeedDish {
        name: "Lasagne",
        image: "lasagne.jpg",
        labels: &["No Fish"],
        dish_types: &["Lunch", "Dinner"],
    },
    SeedDish {
        name: "Butter Chicken",
        image: "butter_chicken.jpg",
        labels: &["No Eggs", "No Fish"],
        dish_types: &["Lunch", "Dinner"],
    },
    SeedDish {
        name: "Sushi",
        image: "sushi.jpg",
        labels: &["No Dairy", "No Eggs", "No Gluten"],
        dish_types: &["Lunch", "Dinner"],
    },
    SeedDish {
        name: "Potato Gratin",
        image: "potato_gratin.jpg",
        labels: &["No Fish", "No Meat", "No Gluten", "No Eggs"],
        dish_types: &["Lunch", "Dinner"],
    },
    SeedDish {
        name: "Tomato Soup",
        image: "tomato_soup.jpg",
        labels: &["No Eggs", "No Fish", "No Gluten", "No Meat"],
        dish_types: &["Lunch", "Dinner"],
    },
    SeedDish {
        name: "Pizza",
        image: "pizza.jpg",
        labels: &["No Dairy", "No Eggs"],
        dish_types: &["Lunch", "Dinner"],
    },
    SeedDish {
        name: "Tortilla Wraps",
        image: "wrap.jpg",
        labels: &["No Eggs"],
        dish_types: &["Breakfast", "Lunch", "Dinner"],
    },
    SeedDish {
        name: "Black Bean Soup",
        image: "blackbean_soup.jpg",
        labels: &["No Fish", "No Eggs", "No Meat", "No Gluten"],
        dish_types: &["Lunch", "Dinner"],
    },
    SeedDish {
        name: "Beef Pho",
        image: "beef_pho.jpg",
        labels: &["No Dairy", "No Eggs", "No Fish"],
        dish_types: &["Breakfast", "Lunch", "Dinner"],
    },
    SeedDish {
        name: "Greek Salad",
        image: "greek_salad.jpg",
        labels: &["No Fish", "No Eggs", "No Meat", "No Gluten"],
        dish_types: &["Lunch"],
    },
    SeedDish {
        name: "Chocolate Ice Cream",
        image: "chocolate_ice_cream.jpeg",
        labels: &["No Meat", "No Fish", "No Gluten"],
        dish_types: &["Dessert"],
    },
    SeedDish {
        name: "Cheesecake",
        image: "cheesecake.jpg",
        labels: &["No Meat", "No Fish"],
        dish_types: &["Dessert"],
    },
    SeedDish {
        name: "Waffles",
        image: "waffles.jpg",
        labels: &["No Meat", "No Fish"],
        dish_types: &["Dessert", "Lunch"],
    },
    SeedDish {
        name: "Apple Pie",
        image: "apple-pie.jpg",
        labels: &["No Meat", "No Fish"],
        dish_types: &["Dessert"],
    },
    SeedDish {
        name: "Macarons",
        image: "macarons.jpg",
        labels: &["No Meat", "No Fish", "No Gluten"],
        dish_types: &["Dessert"],
    },
];

pub async fn run(pool: &PgPool) -> AppResult<()> {
    let catalog = PostgresCatalogRepository::new(pool.clone());
    let users = PostgresUserRepository::new(pool.clone());
    let dishes = PostgresDishRepository::new(pool.clone());
    let hasher = Argon2PasswordHasher::new();

    let mut label_ids = HashMap::new();
    for name in SEED_LABELS {
        let label = catalog.ensure_label(name).await?;
        label_ids.insert(name, label.id());
    }

    let mut dish_type_ids = HashMap::new();
    for name in SEED_DISH_TYPES {
        let dish_type = catalog.ensure_dish_type(name).await?;
        dish_type_ids.insert(name, dish_type.id());
    }

    let mut admin = None;
    for seed in &SEED_USERS {
        let user = ensure_user(&users, &hasher, seed).await?;
        if seed.role == Role::Admin {
            admin = Some(user);
        }
    }
    let Some(admin) = admin else {
        return Ok(());
    };

    let mut created = 0_usize;
    for seed in SEED_DISHES {
        let name = DishName::new(seed.name)?;
        if dishes.find_by_name(&name).await?.is_some() {
            continue;
        }

        dishes
            .create(NewDish {
                name,
                owner_id: admin.id(),
                image_path: Some(format!("public/img/dishes/{}", seed.image)),
                label_ids: lookup(&label_ids, seed.labels),
                dish_type_ids: lookup(&dish_type_ids, seed.dish_types),
            })
            .await?;
        created += 1;
    }

    info!(
        labels = catalog.list_labels().await?.len(),
        users = SEED_USERS.len(),
        dishes_created = created,
        "development seed applied"
    );

    Ok(())
}

async fn ensure_user(
    users: &PostgresUserRepository,
    hasher: &Argon2PasswordHasher,
    seed: &SeedUser,
) -> AppResult<User> {
    let email = EmailAddress::new(seed.email)?;
    if let Some(record) = users.find_by_email(&email).await? {
        return Ok(record.user);
    }

    let user = users
        .create(NewUser {
            username: Username::new(seed.username)?,
            email,
            password_hash: hasher.hash_password(seed.password)?,
            role: seed.role,
        })
        .await?;

    users
        .set_profile_image(user.id(), Some(seed.image_path))
        .await
}

fn lookup<T: Copy>(ids: &HashMap<&str, T>, names: &[&str]) -> Vec<T> {
    names
        .iter()
        .filter_map(|name| ids.get(name).copied())
        .collect()
}
