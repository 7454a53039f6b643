use super::helpers::*;

#[test]
fn test_if_true_branch() {
    check("if true then print(1) end", "1\n");
    check("if false then print(1) end", "");
}

#[test]
fn test_if_else() {
    check("if 1 > 2 then print('a') else print('b') end", "b\n");
}

#[test]
fn test_if_elseif_chain() {
    let src = "local x = 2
if x == 1 then print('one')
elseif x == 2 then print('two')
elseif x == 3 then print('three')
else print('many')
end";
    check(src, "two\n");
}

#[test]
fn test_if_falls_to_else() {
    let src = "local x = 9
if x == 1 then print('one')
elseif x == 2 then print('two')
else print('many')
end";
    check(src, "many\n");
}

#[test]
fn test_if_condition_truthiness() {
    check("if 0 then print('zero is truthy') end", "zero is truthy\n");
    check("if '' then print('empty is truthy') end", "empty is truthy\n");
    check("if nil then print('no') end", "");
}

#[test]
fn test_while_loop() {
    check(
        "local x = 1\nwhile x < 100 do x = x * 2 end\nprint(x)",
        "128\n",
    );
}

#[test]
fn test_while_never_entered() {
    check("while false do print('no') end print('done')", "done\n");
}

#[test]
fn test_while_break() {
    let src = "local i = 0
while true do
  i = i + 1
  if i == 5 then break end
end
print(i)";
    check(src, "5\n");
}

#[test]
fn test_break_with_body_locals() {
    // The break discards locals declared inside the loop body.
    let src = "local total = 0
while true do
  local step = 10
  total = total + step
  if total >= 30 then break end
end
print(total)";
    check(src, "30\n");
}

#[test]
fn test_for_counts_up() {
    check("for i = 1, 5 do print(i) end", "1\n2\n3\n4\n5\n");
}

#[test]
fn test_for_with_step() {
    check("for i = 1, 10, 3 do print(i) end", "1\n4\n7\n10\n");
}

#[test]
fn test_for_counts_down() {
    check("for i = 3, 1, -1 do print(i) end", "3\n2\n1\n");
}

#[test]
fn test_for_never_entered() {
    check("for i = 10, 1 do print(i) end print('after')", "after\n");
    check("for i = 1, 10, -1 do print(i) end print('after')", "after\n");
}

#[test]
fn test_for_computed_bounds() {
    check(
        "local n = 4\nlocal sum = 0\nfor i = 1, n * 2 do sum = sum + i end\nprint(sum)",
        "36\n",
    );
}

#[test]
fn test_for_computed_step_direction() {
    // The step sign is checked at runtime, so a computed step works.
    check(
        "local s = -2\nfor i = 6, 2, s do print(i) end",
        "6\n4\n2\n",
    );
}

#[test]
fn test_for_break() {
    check(
        "for i = 1, 100 do if i > 3 then break end print(i) end",
        "1\n2\n3\n",
    );
}

#[test]
fn test_for_float_bounds() {
    check("for i = 1.0, 2.5, 0.5 do print(i) end", "1.0\n1.5\n2.0\n2.5\n");
}

#[test]
fn test_nested_for() {
    let src = "local count = 0
for i = 1, 3 do
  for j = 1, 4 do
    count = count + 1
  end
end
print(count)";
    check(src, "12\n");
}

#[test]
fn test_nested_loop_break_is_inner_only() {
    let src = "local hits = 0
for i = 1, 3 do
  for j = 1, 10 do
    if j == 2 then break end
    hits = hits + 1
  end
end
print(hits)";
    check(src, "3\n");
}

#[test]
fn test_repeat_runs_body_first() {
    check("local x = 10\nrepeat x = x + 1 until true\nprint(x)", "11\n");
}

#[test]
fn test_repeat_until() {
    check(
        "local x = 1\nrepeat x = x * 3 until x > 20\nprint(x)",
        "27\n",
    );
}

#[test]
fn test_repeat_condition_sees_body_local() {
    // The until condition observes locals declared inside the body.
    let src = "local n = 0
repeat
  local done = n >= 2
  n = n + 1
until done
print(n)";
    check(src, "3\n");
}

#[test]
fn test_repeat_break() {
    check(
        "local i = 0\nrepeat i = i + 1 if i == 4 then break end until false\nprint(i)",
        "4\n",
    );
}

#[test]
fn test_do_block() {
    check("do print('inner') end print('outer')", "inner\nouter\n");
}

#[test]
fn test_short_circuit_and() {
    // The right operand must not run when the left is falsy.
    check("local x = false and undefined_global\nprint(x)", "false\n");
    check("print(nil and nil == nil)", "nil\n");
}

#[test]
fn test_short_circuit_or() {
    check("local x = 1 or undefined_global\nprint(x)", "1\n");
    check("print(false or 42)", "42\n");
}

#[test]
fn test_and_or_yield_operands() {
    check("print(1 and 2)", "2\n");
    check("print(nil and 2)", "nil\n");
    check("print(false or 'fallback')", "fallback\n");
    check("print('first' or 'second')", "first\n");
}

#[test]
fn test_return_stops_execution() {
    check("print(1) return ; print(2)", "1\n");
    check("print('a') return", "a\n");
}

#[test]
fn test_return_expression_is_evaluated() {
    check("return print(7)", "7\n");
}

#[test]
fn test_return_inside_loop() {
    check(
        "for i = 1, 10 do if i == 3 then print(i) return end end",
        "3\n",
    );
}

#[test]
fn test_conditions_with_and_or() {
    check(
        "local a = 5\nif a > 0 and a < 10 then print('in range') end",
        "in range\n",
    );
    check(
        "local a = 15\nif a < 0 or a > 10 then print('out of range') end",
        "out of range\n",
    );
}
