use serde_json::{json, Value};

fn failure(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn success(description: &str, schema: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") }
            }
        }
    })
}

fn flag_param(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": description,
        "schema": { "type": "string", "enum": ["0", "1"] }
    })
}

fn book_id_param() -> Value {
    json!({
        "name": "book_id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn book_input_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookInput" }
            }
        }
    })
}

/// OpenAPI fragment for the books module; paths are relative to `/api/books`.
pub fn document() -> Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [
                        {
                            "name": "name",
                            "in": "query",
                            "required": false,
                            "description": "Case-insensitive substring of the book name",
                            "schema": { "type": "string" }
                        },
                        flag_param("reading", "1 for books being read, anything else for the rest"),
                        flag_param("finished", "1 for finished books, anything else for the rest")
                    ],
                    "responses": {
                        "200": success("Matching books", "BookListResponse")
                    }
                },
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": book_input_body(),
                    "responses": {
                        "201": success("Book added", "BookCreatedResponse"),
                        "400": failure("Missing name, readPage over pageCount, or malformed body")
                    }
                }
            },
            "/{book_id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param()],
                    "responses": {
                        "200": success("The book", "BookResponse"),
                        "404": failure("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param()],
                    "requestBody": book_input_body(),
                    "responses": {
                        "200": success("Book updated", "MessageResponse"),
                        "400": failure("Missing name, readPage over pageCount, or malformed body"),
                        "404": failure("Id not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param()],
                    "responses": {
                        "200": success("Book deleted", "MessageResponse"),
                        "404": failure("Id not found")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": { "schema": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "year": { "type": "integer" },
                        "author": { "type": "string" },
                        "summary": { "type": "string" },
                        "publisher": { "type": "string" },
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "finished": { "type": "boolean" },
                        "reading": { "type": "boolean" },
                        "insertedAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    },
                    "required": [
                        "id", "name", "year", "author", "summary", "publisher", "pageCount",
                        "readPage", "finished", "reading", "insertedAt", "updatedAt"
                    ]
                },
                "BookInput": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "year": { "type": "integer" },
                        "author": { "type": "string" },
                        "summary": { "type": "string" },
                        "publisher": { "type": "string" },
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "reading": { "type": "boolean" }
                    },
                    "required": ["name"]
                },
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "publisher": { "type": "string" }
                    },
                    "required": ["id", "name", "publisher"]
                },
                "BookListResponse": {
                    "type": "object",
                    "properties": {
                        "status": { "type": "string" },
                        "data": {
                            "type": "object",
                            "properties": {
                                "books": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/BookSummary" }
                                }
                            }
                        }
                    }
                },
                "BookResponse": {
                    "type": "object",
                    "properties": {
                        "status": { "type": "string" },
                        "data": {
                            "type": "object",
                            "properties": {
                                "book": { "$ref": "#/components/schemas/Book" }
                            }
                        }
                    }
                },
                "BookCreatedResponse": {
                    "type": "object",
                    "properties": {
                        "status": { "type": "string" },
                        "message": { "type": "string" },
                        "data": {
                            "type": "object",
                            "properties": {
                                "bookId": { "type": "string" }
                            }
                        }
                    }
                },
                "MessageResponse": {
                    "type": "object",
                    "properties": {
                        "status": { "type": "string" },
                        "message": { "type": "string" }
                    }
                }
            }
        }
    })
}
