use acrewity_node::domain::schema;

/// 輸出節點描述 (resources / operations / fields) 的 JSON
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let description = schema::describe();
    println!("{}", serde_json::to_string_pretty(&description)?);
    Ok(())
}
